//! # tempo-core - Core Domain Types
//!
//! Foundation crate for Tempo. Provides the lifecycle records, device identity
//! snapshot, time source abstraction, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, toml, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`SessionStatus`] - Whether a usage session is open (Idle, Active)
//! - [`DeviceInfoSnapshot`] - OS version, hardware model, and device identifier
//!
//! ### Events (`events`)
//! - [`AnalyticsEvent`] - A named, timestamped record handed to the recording sink
//! - [`EventKind`] - `session_start` or `session_end`
//!
//! ### Time (`clock`)
//! - [`Clock`] - Source of the current instant
//! - [`SystemClock`], [`ManualClock`] - Wall clock and test clock
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use tempo_core::prelude::*;
//! ```

pub mod clock;
pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all Tempo crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result, ResultExt};
pub use events::{AnalyticsEvent, EventKind, APP_SESSION_CATEGORY};
pub use types::{DeviceInfoSnapshot, SessionStatus};
