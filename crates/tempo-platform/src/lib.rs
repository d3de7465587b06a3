//! # tempo-platform - Platform Adapters
//!
//! Narrow interfaces to the collaborators Tempo does not own, with one
//! concrete adapter per platform or storage medium.
//!
//! Depends on [`tempo_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Storage
//! - [`StoreProvider`] / [`KeyValueStore`] - Scoped string key-value storage
//! - [`FileStoreProvider`] - One TOML file per scope with advisory locking
//! - [`MemoryStoreProvider`] - Process-local scopes
//!
//! ### Device Metadata
//! - [`DeviceInfoSource`] - OS version and hardware model
//! - [`SystemDeviceInfo`] - Reads from the running platform
//! - [`StaticDeviceInfo`] - Fixed values
//!
//! ### Recording
//! - [`RecordingSink`] - Fire-and-forget destination for lifecycle records
//! - [`ChannelSink`] - Forwards into a tokio channel
//! - [`TracingSink`] - Emits structured tracing events

pub mod device;
pub mod sink;
pub mod store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use device::{DeviceInfoSource, StaticDeviceInfo, SystemDeviceInfo};
pub use sink::{ChannelSink, RecordingSink, TracingSink};
pub use store::{
    default_store_directory, validate_scope, FileStore, FileStoreProvider, KeyValueStore,
    MemoryStore, MemoryStoreProvider, StoreProvider,
};
