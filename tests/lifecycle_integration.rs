//! Integration tests for session tracking and device identity
//!
//! These drive the public API the way a host application would: build an
//! `Analytics` from settings, feed lifecycle signals, and inspect what reached
//! the recording sink and the identity store.

use std::sync::Arc;

use chrono::Duration;
use regex::Regex;
use tempfile::tempdir;
use tempo_app::config::{load_settings, save_settings, Settings, StoreBackend};
use tempo_app::{Analytics, EventKind, SessionStatus, DEVICE_ID_KEY};
use tempo_core::ManualClock;
use tempo_platform::test_utils::CapturingSink;
use tempo_platform::{FileStoreProvider, KeyValueStore, StoreProvider};

fn file_settings(dir: &std::path::Path) -> Settings {
    let mut settings = Settings::default();
    settings.storage.backend = StoreBackend::File;
    settings.storage.directory = Some(dir.to_path_buf());
    settings.device.os_version = Some("10.2".to_string());
    settings.device.model = Some("Watch6,1".to_string());
    settings
}

fn canonical_id() -> Regex {
    Regex::new(r"^[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}$").unwrap()
}

#[test]
fn test_fresh_install_generates_and_stores_id() {
    let temp = tempdir().unwrap();
    let settings = file_settings(temp.path());
    let analytics = Analytics::new(&settings, Arc::new(CapturingSink::new()));

    let info = analytics.device_info();
    assert!(canonical_id().is_match(&info.device_id));

    let stored = FileStoreProvider::new(temp.path())
        .open(&settings.storage.scope)
        .unwrap()
        .get(DEVICE_ID_KEY)
        .unwrap();
    assert_eq!(stored.as_deref(), Some(info.device_id.as_str()));
}

#[test]
fn test_prepopulated_id_is_returned_verbatim() {
    let temp = tempdir().unwrap();
    let settings = file_settings(temp.path());
    FileStoreProvider::new(temp.path())
        .open(&settings.storage.scope)
        .unwrap()
        .set(DEVICE_ID_KEY, "ABC-123")
        .unwrap();

    let analytics = Analytics::new(&settings, Arc::new(CapturingSink::new()));
    assert_eq!(analytics.device_id().unwrap(), "ABC-123");
}

#[test]
fn test_id_is_stable_across_launches() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    save_settings(&config_path, &file_settings(&temp.path().join("stores"))).unwrap();

    let ids: Vec<String> = (0..3)
        .map(|_| {
            let settings = load_settings(&config_path);
            Analytics::new(&settings, Arc::new(CapturingSink::new()))
                .device_info()
                .device_id
        })
        .collect();

    assert!(canonical_id().is_match(&ids[0]));
    assert!(ids.iter().all(|id| id == &ids[0]));
}

#[test]
fn test_session_round_trip() {
    let temp = tempdir().unwrap();
    let sink = Arc::new(CapturingSink::new());
    let clock = Arc::new(ManualClock::default());
    let analytics = Analytics::with_clock(&file_settings(temp.path()), sink.clone(), clock.clone());

    analytics.record_application_did_become_active();
    clock.advance(Duration::seconds(10));
    analytics.record_application_will_resign_active();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::SessionStart);
    assert_eq!(events[1].kind, EventKind::SessionEnd);
    assert_eq!(events[1].duration_ms, Some(10_000));
    assert_eq!(analytics.session_status(), SessionStatus::Idle);
}

#[test]
fn test_resign_without_start_emits_nothing() {
    let temp = tempdir().unwrap();
    let sink = Arc::new(CapturingSink::new());
    let analytics = Analytics::new(&file_settings(temp.path()), sink.clone());

    analytics.record_application_will_resign_active();

    assert!(sink.is_empty());
    assert_eq!(analytics.session_status(), SessionStatus::Idle);
}

#[test]
fn test_unavailable_store_still_reports_device_metadata() {
    let temp = tempdir().unwrap();
    let blocker = temp.path().join("stores");
    std::fs::write(&blocker, "not a directory").unwrap();

    let analytics = Analytics::new(&file_settings(&blocker), Arc::new(CapturingSink::new()));

    assert!(analytics.device_id().is_err());
    let info = analytics.device_info();
    assert_eq!(info.os_version, "10.2");
    assert_eq!(info.model, "Watch6,1");
    assert_eq!(info.device_id, "");
}
