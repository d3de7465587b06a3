//! Per-install device identifier
//!
//! Mobile platforms don't hand out a stable hardware identifier, so one is
//! generated on first use and persisted in a scoped key-value store. Every
//! later call reads it back unchanged.

use std::fmt;
use std::sync::{Arc, Mutex};

use tempo_core::prelude::*;
use tempo_core::DeviceInfoSnapshot;
use tempo_platform::{DeviceInfoSource, StoreProvider};
use thiserror::Error;
use uuid::Uuid;

/// Key the identifier is persisted under
pub const DEVICE_ID_KEY: &str = "dev.tempo.analytics.deviceId";

/// Default store scope (shared app group)
pub const DEFAULT_STORE_SCOPE: &str = "group.dev.tempo.analytics";

/// Failure to resolve the device identifier
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The store could not be opened, read, or written
    #[error("device identity store '{scope}' is unavailable")]
    StoreUnavailable {
        scope: String,
        #[source]
        source: Error,
    },
}

impl IdentityError {
    fn unavailable(scope: &str, source: Error) -> Self {
        Self::StoreUnavailable {
            scope: scope.to_string(),
            source,
        }
    }
}

/// Generate a 128-bit random token in canonical 8-4-4-4-12 uppercase form
pub fn generate_token() -> String {
    let uuid = uuid::Builder::from_random_bytes(rand::random()).into_uuid();
    uuid.hyphenated()
        .encode_upper(&mut Uuid::encode_buffer())
        .to_string()
}

/// Resolves the device identifier and assembles device metadata around it
pub struct DeviceIdentityProvider {
    stores: Arc<dyn StoreProvider>,
    device: Arc<dyn DeviceInfoSource>,
    scope: String,
    creation: Mutex<()>,
}

impl DeviceIdentityProvider {
    pub fn new(
        stores: Arc<dyn StoreProvider>,
        device: Arc<dyn DeviceInfoSource>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            stores,
            device,
            scope: scope.into(),
            creation: Mutex::new(()),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Return the persisted identifier, generating and storing one on first use.
    ///
    /// Calls on one provider are serialized around the read-generate-write
    /// sequence, so at most one identifier is generated per provider. Separate
    /// providers or processes sharing a store converge on the last value written.
    pub fn get_or_create_device_id(&self) -> std::result::Result<String, IdentityError> {
        let store = self
            .stores
            .open(&self.scope)
            .map_err(|e| IdentityError::unavailable(&self.scope, e))?;

        let _guard = self.creation.lock().unwrap_or_else(|e| e.into_inner());

        let existing = store
            .get(DEVICE_ID_KEY)
            .map_err(|e| IdentityError::unavailable(&self.scope, e))?;

        match existing {
            Some(id) if !id.trim().is_empty() => return Ok(id),
            Some(_) => warn!(
                "Blank device identifier in store '{}', generating a new one",
                self.scope
            ),
            None => {}
        }

        let id = generate_token();
        store
            .set(DEVICE_ID_KEY, &id)
            .map_err(|e| IdentityError::unavailable(&self.scope, e))?;

        info!("Generated device identifier for store '{}'", self.scope);
        Ok(id)
    }

    /// OS version, hardware model, and device identifier for the current device.
    ///
    /// Never fails: an unreachable identity store yields an empty `device_id`.
    pub fn device_info_snapshot(&self) -> DeviceInfoSnapshot {
        let os_version = self.device.os_version();
        let model = self.device.hardware_model();

        let device_id = match self.get_or_create_device_id() {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to get an ID for this device: {:?}", e);
                String::new()
            }
        };

        DeviceInfoSnapshot {
            os_version,
            model,
            device_id,
        }
    }
}

impl fmt::Debug for DeviceIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceIdentityProvider")
            .field("scope", &self.scope)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}
