//! Core domain types for session tracking and device identity

use serde::{Deserialize, Serialize};

/// Whether a usage session is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Active,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Active => write!(f, "active"),
        }
    }
}

/// Device identity tuple stamped onto outgoing events
///
/// Computed on demand and never persisted. `device_id` is empty when the
/// identity store could not be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfoSnapshot {
    pub os_version: String,
    pub model: String,
    pub device_id: String,
}

impl DeviceInfoSnapshot {
    pub fn new(
        os_version: impl Into<String>,
        model: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            os_version: os_version.into(),
            model: model.into(),
            device_id: device_id.into(),
        }
    }

    /// True when the identifier could not be resolved
    pub fn is_anonymous(&self) -> bool {
        self.device_id.is_empty()
    }
}
