//! Analytics records handed to the recording sink

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category attached to every lifecycle record
pub const APP_SESSION_CATEGORY: &str = "app_session";

/// Kind of lifecycle record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionStart,
    SessionEnd,
}

impl EventKind {
    /// Event name as seen by the recording pipeline
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::SessionStart => "session_start",
            EventKind::SessionEnd => "session_end",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, timestamped record with an optional duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Pairs a start record with its end record
    pub session_id: String,

    pub category: String,

    pub timestamp: DateTime<Utc>,

    /// Elapsed active time, only present on `session_end`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

impl AnalyticsEvent {
    pub fn session_start(session_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: EventKind::SessionStart,
            session_id: session_id.into(),
            category: APP_SESSION_CATEGORY.to_string(),
            timestamp,
            duration_ms: None,
        }
    }

    /// Build a `session_end` record. Negative durations are clamped to zero.
    pub fn session_end(
        session_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        duration: chrono::Duration,
    ) -> Self {
        Self {
            kind: EventKind::SessionEnd,
            session_id: session_id.into(),
            category: APP_SESSION_CATEGORY.to_string(),
            timestamp,
            duration_ms: Some(duration.num_milliseconds().max(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Duration as a `chrono::Duration`, if this record carries one
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.duration_ms.map(chrono::Duration::milliseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_session_start_has_no_duration() {
        let event = AnalyticsEvent::session_start("abc", at(0));
        assert_eq!(event.kind, EventKind::SessionStart);
        assert_eq!(event.name(), "session_start");
        assert_eq!(event.category, APP_SESSION_CATEGORY);
        assert!(event.duration().is_none());
    }

    #[test]
    fn test_session_end_clamps_negative_duration() {
        let event = AnalyticsEvent::session_end("abc", at(0), chrono::Duration::seconds(-5));
        assert_eq!(event.duration_ms, Some(0));
    }

    #[test]
    fn test_serialized_shape() {
        let event = AnalyticsEvent::session_end("abc", at(10), chrono::Duration::seconds(10));
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "session_end");
        assert_eq!(json["session_id"], "abc");
        assert_eq!(json["category"], "app_session");
        assert_eq!(json["duration_ms"], 10_000);

        let start = AnalyticsEvent::session_start("abc", at(0));
        let json: serde_json::Value = serde_json::to_value(&start).unwrap();
        assert!(json.get("duration_ms").is_none());
    }
}
