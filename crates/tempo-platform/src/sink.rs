//! Recording sinks for lifecycle records
//!
//! Emission is fire-and-forget: a sink never reports failure back to the
//! caller. Batching, transport, and retry belong to whatever sits behind it.

use std::fmt;

use tempo_core::prelude::*;
use tempo_core::AnalyticsEvent;
use tokio::sync::mpsc;

/// Accepts lifecycle records for delivery
///
/// `record` is called while the session tracker holds its state lock, so an
/// implementation must not call back into the tracker (or anything that
/// reads session status) from inside `record`.
pub trait RecordingSink: Send + Sync + fmt::Debug {
    fn record(&self, event: AnalyticsEvent);
}

/// Forwards records into an unbounded channel
///
/// Sending never blocks, so the sink is safe to call from synchronous
/// lifecycle callbacks.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<AnalyticsEvent>,
}

impl ChannelSink {
    /// Create a sink along with the receiving half of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AnalyticsEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RecordingSink for ChannelSink {
    fn record(&self, event: AnalyticsEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!(
                "Recording channel closed, dropping {} record for session {}",
                e.0.kind, e.0.session_id
            );
        }
    }
}

/// Writes each record as a structured tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl RecordingSink for TracingSink {
    fn record(&self, event: AnalyticsEvent) {
        info!(
            target: "tempo::events",
            event = %event.kind,
            session_id = %event.session_id,
            category = %event.category,
            timestamp = %event.timestamp.to_rfc3339(),
            duration_ms = ?event.duration_ms,
            "lifecycle record"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        let now = Utc::now();

        sink.record(AnalyticsEvent::session_start("s1", now));
        sink.record(AnalyticsEvent::session_end(
            "s1",
            now,
            chrono::Duration::seconds(1),
        ));

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.name(), "session_start");
        assert_eq!(second.name(), "session_end");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_closed_receiver_is_silent() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        // Must not panic
        sink.record(AnalyticsEvent::session_start("s1", Utc::now()));
    }

    #[test]
    fn test_tracing_sink_accepts_records() {
        TracingSink.record(AnalyticsEvent::session_start("s1", Utc::now()));
    }
}
