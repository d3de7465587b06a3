//! Platform device metadata
//!
//! [`SystemDeviceInfo`] asks the running platform for its OS version and
//! hardware model on every call. Hosts that already know these values (or
//! run somewhere the lookups make no sense) can supply a [`StaticDeviceInfo`].

use std::fmt;

/// Source of OS version and hardware model
pub trait DeviceInfoSource: Send + Sync + fmt::Debug {
    fn os_version(&self) -> String;

    fn hardware_model(&self) -> String;
}

/// Reads device metadata from the host platform
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDeviceInfo;

impl DeviceInfoSource for SystemDeviceInfo {
    fn os_version(&self) -> String {
        platform::os_version().unwrap_or_else(fallback_os_version)
    }

    fn hardware_model(&self) -> String {
        platform::hardware_model().unwrap_or_else(|| std::env::consts::ARCH.to_string())
    }
}

fn fallback_os_version() -> String {
    std::env::consts::OS.to_string()
}

/// Fixed metadata supplied by the host or configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDeviceInfo {
    os_version: String,
    model: String,
}

impl StaticDeviceInfo {
    pub fn new(os_version: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            os_version: os_version.into(),
            model: model.into(),
        }
    }
}

impl DeviceInfoSource for StaticDeviceInfo {
    fn os_version(&self) -> String {
        self.os_version.clone()
    }

    fn hardware_model(&self) -> String {
        self.model.clone()
    }
}

/// Trim a raw platform value, treating blank output as missing
fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::non_empty;

    const OS_RELEASE: &str = "/proc/sys/kernel/osrelease";
    const PRODUCT_NAME: &str = "/sys/devices/virtual/dmi/id/product_name";

    pub fn os_version() -> Option<String> {
        std::fs::read_to_string(OS_RELEASE)
            .ok()
            .and_then(|raw| non_empty(&raw))
    }

    pub fn hardware_model() -> Option<String> {
        std::fs::read_to_string(PRODUCT_NAME)
            .ok()
            .and_then(|raw| non_empty(&raw))
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::non_empty;
    use std::process::Command;

    fn run(program: &str, args: &[&str]) -> Option<String> {
        let output = Command::new(program).args(args).output().ok()?;
        if !output.status.success() {
            tracing::debug!("{} {:?} exited with {}", program, args, output.status);
            return None;
        }
        non_empty(&String::from_utf8_lossy(&output.stdout))
    }

    pub fn os_version() -> Option<String> {
        run("sw_vers", &["-productVersion"])
    }

    pub fn hardware_model() -> Option<String> {
        run("sysctl", &["-n", "hw.model"])
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod platform {
    pub fn os_version() -> Option<String> {
        None
    }

    pub fn hardware_model() -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_device_info() {
        let info = StaticDeviceInfo::new("10.2", "Apple Watch");
        assert_eq!(info.os_version(), "10.2");
        assert_eq!(info.hardware_model(), "Apple Watch");
    }

    #[test]
    fn test_system_device_info_never_blank() {
        let info = SystemDeviceInfo;
        assert!(!info.os_version().trim().is_empty());
        assert!(!info.hardware_model().trim().is_empty());
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  6.1.0\n"), Some("6.1.0".to_string()));
        assert_eq!(non_empty(" \n"), None);
    }
}
