//! Headless lifecycle driver - NDJSON output for scripting
//!
//! Reads one signal per line from stdin and writes every record the sink
//! receives to stdout, one JSON object per line.
//!
//! # Input
//!
//! `active`, `resign`, `device`, `status`, `enable`, `disable`, `quit`
//!
//! # Example Output
//!
//! ```json
//! {"event":"session_start","session_id":"5F0C...","category":"app_session","timestamp":"2024-01-01T12:00:00Z"}
//! {"event":"session_end","session_id":"5F0C...","category":"app_session","timestamp":"2024-01-01T12:00:10Z","duration_ms":10000}
//! {"event":"device_info","os_version":"6.1.0","model":"ThinkPad","device_id":"9A1B..."}
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::Result;
use serde::Serialize;
use tempo_app::{Analytics, DeviceInfoSnapshot, SessionStatus, Settings};
use tempo_platform::ChannelSink;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

/// Input signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Active,
    Resign,
    Device,
    Status,
    Enable,
    Disable,
    Quit,
}

impl Signal {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "active" | "became_active" => Some(Signal::Active),
            "resign" | "will_resign_active" => Some(Signal::Resign),
            "device" => Some(Signal::Device),
            "status" => Some(Signal::Status),
            "enable" => Some(Signal::Enable),
            "disable" => Some(Signal::Disable),
            "quit" | "exit" => Some(Signal::Quit),
            _ => None,
        }
    }
}

/// Non-record output lines
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum DriverEvent {
    DeviceInfo {
        #[serde(flatten)]
        snapshot: DeviceInfoSnapshot,
    },
    Status {
        status: SessionStatus,
        enabled: bool,
    },
    Error {
        message: String,
    },
}

/// Run the driver until `quit` or end of input
pub async fn run(settings: &Settings) -> Result<()> {
    let (sink, mut records) = ChannelSink::new();
    let analytics = Analytics::new(settings, Arc::new(sink));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match Signal::parse(&line) {
            Some(Signal::Active) => analytics.record_application_did_become_active(),
            Some(Signal::Resign) => analytics.record_application_will_resign_active(),
            Some(Signal::Device) => emit(&DriverEvent::DeviceInfo {
                snapshot: analytics.device_info(),
            }),
            Some(Signal::Status) => emit(&DriverEvent::Status {
                status: analytics.session_status(),
                enabled: analytics.is_enabled(),
            }),
            Some(Signal::Enable) => analytics.set_enabled(true),
            Some(Signal::Disable) => analytics.set_enabled(false),
            Some(Signal::Quit) => break,
            None => emit(&DriverEvent::Error {
                message: format!("unknown signal: {}", line.trim()),
            }),
        }

        while let Ok(record) = records.try_recv() {
            emit(&record);
        }
    }

    debug!("Simulation input finished");
    Ok(())
}

fn emit<T: Serialize>(value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize driver output: {}", e);
            return;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", json).and_then(|_| stdout.flush()) {
        error!("Failed to write driver output: {}", e);
    }
}
