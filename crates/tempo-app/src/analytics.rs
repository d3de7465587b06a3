//! Composition root for the host application
//!
//! [`Analytics`] owns the session tracker and the identity provider for the
//! lifetime of the process. The host builds it once at startup and routes its
//! lifecycle callbacks through it. The enablement flag lives here: the tracker
//! and provider always act when called.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tempo_core::prelude::*;
use tempo_core::{Clock, DeviceInfoSnapshot, SessionStatus, SystemClock};
use tempo_platform::{
    DeviceInfoSource, FileStoreProvider, MemoryStoreProvider, RecordingSink, StaticDeviceInfo,
    StoreProvider, SystemDeviceInfo,
};

use crate::config::{Settings, StoreBackend};
use crate::identity::{DeviceIdentityProvider, IdentityError};
use crate::session::SessionTracker;

/// Session tracking and device identity behind an enablement gate
#[derive(Debug)]
pub struct Analytics {
    enabled: AtomicBool,
    tracker: SessionTracker,
    identity: DeviceIdentityProvider,
}

impl Analytics {
    /// Build from settings, recording into `sink`
    pub fn new(settings: &Settings, sink: Arc<dyn RecordingSink>) -> Self {
        Self::with_clock(settings, sink, Arc::new(SystemClock))
    }

    pub fn with_clock(
        settings: &Settings,
        sink: Arc<dyn RecordingSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let stores: Arc<dyn StoreProvider> = match settings.storage.backend {
            StoreBackend::File => match &settings.storage.directory {
                Some(dir) => Arc::new(FileStoreProvider::new(dir)),
                None => Arc::new(FileStoreProvider::default_location()),
            },
            StoreBackend::Memory => Arc::new(MemoryStoreProvider::new()),
        };

        let device: Arc<dyn DeviceInfoSource> = match settings.device.overrides() {
            Some((os_version, model)) => Arc::new(StaticDeviceInfo::new(os_version, model)),
            None => Arc::new(SystemDeviceInfo),
        };

        debug!(
            "Analytics using {} store, scope '{}'",
            settings.storage.backend, settings.storage.scope
        );

        Self::with_parts(
            settings.analytics.enabled,
            SessionTracker::with_clock(sink, clock),
            DeviceIdentityProvider::new(stores, device, settings.storage.scope.clone()),
        )
    }

    /// Assemble from explicitly constructed components
    pub fn with_parts(
        enabled: bool,
        tracker: SessionTracker,
        identity: DeviceIdentityProvider,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            tracker,
            identity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!(
            "Analytics recording {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Call from the host's "did become active" hook
    pub fn record_application_did_become_active(&self) {
        if !self.is_enabled() {
            trace!("Analytics disabled, ignoring became-active");
            return;
        }
        self.tracker.record_became_active();
    }

    /// Call from the host's "will resign active" hook
    pub fn record_application_will_resign_active(&self) {
        if !self.is_enabled() {
            trace!("Analytics disabled, ignoring will-resign-active");
            return;
        }
        self.tracker.record_will_resign_active();
    }

    /// Device identity tuple for stamping outgoing events
    pub fn device_info(&self) -> DeviceInfoSnapshot {
        self.identity.device_info_snapshot()
    }

    pub fn device_id(&self) -> std::result::Result<String, IdentityError> {
        self.identity.get_or_create_device_id()
    }

    pub fn session_status(&self) -> SessionStatus {
        self.tracker.status()
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn identity(&self) -> &DeviceIdentityProvider {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;
    use tempo_core::{EventKind, ManualClock};
    use tempo_platform::test_utils::CapturingSink;

    fn memory_settings() -> Settings {
        let mut settings = Settings::default();
        settings.storage.backend = StoreBackend::Memory;
        settings.device.os_version = Some("10.2".to_string());
        settings.device.model = Some("Watch6,1".to_string());
        settings
    }

    #[test]
    fn test_lifecycle_flows_to_sink() {
        let sink = Arc::new(CapturingSink::new());
        let clock = Arc::new(ManualClock::default());
        let analytics = Analytics::with_clock(&memory_settings(), sink.clone(), clock.clone());

        analytics.record_application_did_become_active();
        assert_eq!(analytics.session_status(), SessionStatus::Active);
        clock.advance(Duration::seconds(42));
        analytics.record_application_will_resign_active();

        let events = sink.events();
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![EventKind::SessionStart, EventKind::SessionEnd]
        );
        assert_eq!(events[1].duration(), Some(Duration::seconds(42)));
    }

    #[test]
    fn test_disabled_records_nothing() {
        let sink = Arc::new(CapturingSink::new());
        let mut settings = memory_settings();
        settings.analytics.enabled = false;
        let analytics = Analytics::new(&settings, sink.clone());

        analytics.record_application_did_become_active();
        analytics.record_application_will_resign_active();

        assert!(!analytics.is_enabled());
        assert!(sink.is_empty());
        assert_eq!(analytics.session_status(), SessionStatus::Idle);
    }

    #[test]
    fn test_toggle_enabled() {
        let sink = Arc::new(CapturingSink::new());
        let analytics = Analytics::new(&memory_settings(), sink.clone());

        analytics.set_enabled(false);
        analytics.record_application_did_become_active();
        assert!(sink.is_empty());

        analytics.set_enabled(true);
        analytics.record_application_did_become_active();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_device_info_not_gated() {
        let sink = Arc::new(CapturingSink::new());
        let mut settings = memory_settings();
        settings.analytics.enabled = false;
        let analytics = Analytics::new(&settings, sink);

        let info = analytics.device_info();
        assert_eq!(info.os_version, "10.2");
        assert_eq!(info.model, "Watch6,1");
        assert_eq!(info.device_id, analytics.device_id().unwrap());
    }

    #[test]
    fn test_file_backend_uses_configured_directory() {
        let temp = tempdir().unwrap();
        let mut settings = memory_settings();
        settings.storage.backend = StoreBackend::File;
        settings.storage.directory = Some(temp.path().to_path_buf());

        let analytics = Analytics::new(&settings, Arc::new(CapturingSink::new()));
        let id = analytics.device_id().unwrap();

        let path = temp.path().join(format!("{}.toml", settings.storage.scope));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains(&id));
    }

    #[test]
    fn test_misconfigured_scope_degrades_to_empty_id() {
        let mut settings = memory_settings();
        settings.storage.scope = "not a valid scope".to_string();
        let analytics = Analytics::new(&settings, Arc::new(CapturingSink::new()));

        assert!(matches!(
            analytics.device_id(),
            Err(IdentityError::StoreUnavailable { .. })
        ));
        let info = analytics.device_info();
        assert!(info.is_anonymous());
        assert_eq!(info.model, "Watch6,1");
    }
}
