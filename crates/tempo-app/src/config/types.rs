//! Configuration types for Tempo
//!
//! Defines:
//! - `Settings` - Top-level settings (`config.toml`)
//! - `AnalyticsSettings`, `StorageSettings`, `DeviceSettings` - Sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::identity::DEFAULT_STORE_SCOPE;

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub analytics: AnalyticsSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub device: DeviceSettings,
}

/// Recording gate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyticsSettings {
    /// Whether lifecycle signals are recorded at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Where the device identifier is persisted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Application or app-group scope the identifier lives in
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Base directory for the file backend (defaults to the data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            scope: default_scope(),
            directory: None,
        }
    }
}

/// Storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Device metadata overrides
///
/// When both fields are set the platform is never queried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl DeviceSettings {
    /// Both overrides, if fully specified
    pub fn overrides(&self) -> Option<(&str, &str)> {
        match (&self.os_version, &self.model) {
            (Some(os), Some(model)) => Some((os.as_str(), model.as_str())),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_scope() -> String {
    DEFAULT_STORE_SCOPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(settings.analytics.enabled);
        assert_eq!(settings.storage.backend, StoreBackend::File);
        assert_eq!(settings.storage.scope, DEFAULT_STORE_SCOPE);
        assert!(settings.storage.directory.is_none());
        assert!(settings.device.overrides().is_none());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_device_override_is_ignored() {
        let device = DeviceSettings {
            os_version: Some("10.2".to_string()),
            model: None,
        };
        assert!(device.overrides().is_none());
    }

    #[test]
    fn test_backend_parsing() {
        let settings: Settings = toml::from_str("[storage]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(settings.storage.backend, StoreBackend::Memory);
        assert_eq!(settings.storage.backend.to_string(), "memory");
    }
}
