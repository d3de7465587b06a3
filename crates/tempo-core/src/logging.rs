//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "TEMPO_LOG";

const DEFAULT_FILTER: &str = "tempo=info,tempo_core=info,tempo_platform=info,tempo_app=info,warn";
const LOG_FILE_NAME: &str = "tempo.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/tempo/logs/`
/// Log level is controlled by `TEMPO_LOG` environment variable.
///
/// # Examples
/// ```bash
/// TEMPO_LOG=debug tempo simulate
/// TEMPO_LOG=tempo_app=trace tempo device
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("Tempo logging initialized in {}", log_dir.display());

    Ok(())
}

/// Build the filter from `TEMPO_LOG`, falling back to the default directives
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("tempo").join("logs"))
}
