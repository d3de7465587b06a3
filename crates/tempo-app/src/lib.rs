//! tempo-app - Session tracking and device identity for Tempo
//!
//! This crate implements the usage-session state machine, the persisted
//! device identifier, configuration loading, and the [`Analytics`]
//! composition root that hosts wire their lifecycle callbacks into.

pub mod analytics;
pub mod config;
pub mod identity;
pub mod session;

// Re-export primary types
pub use analytics::Analytics;
pub use config::{load_settings, Settings};
pub use identity::{
    generate_token, DeviceIdentityProvider, IdentityError, DEFAULT_STORE_SCOPE, DEVICE_ID_KEY,
};
pub use session::{SessionState, SessionTracker};

// Re-export core types hosts need alongside the app API
pub use tempo_core::{AnalyticsEvent, DeviceInfoSnapshot, EventKind, SessionStatus};
