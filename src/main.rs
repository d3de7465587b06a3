//! Tempo - Session lifecycle and device identity driver
//!
//! This is the binary entry point. All logic lives in the workspace crates.

mod simulate;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tempo_app::config::{default_config_path, init_config, load_settings};
use tempo_app::Analytics;
use tempo_platform::TracingSink;

/// Tempo - Session lifecycle and device identity for mobile analytics
#[derive(Parser, Debug)]
#[command(name = "tempo")]
#[command(about = "Session lifecycle and device identity driver", long_about = None)]
struct Args {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read lifecycle signals from stdin and print records as NDJSON
    Simulate,

    /// Print the device identity snapshot as JSON
    Device,

    /// Write a default config file if none exists
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tempo_core::logging::init()?;

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(default_config_path);

    match args.command {
        Command::Simulate => {
            let settings = load_settings(&config_path);
            simulate::run(&settings).await
        }
        Command::Device => {
            let settings = load_settings(&config_path);
            let analytics = Analytics::new(&settings, Arc::new(TracingSink));
            println!("{}", serde_json::to_string(&analytics.device_info())?);
            Ok(())
        }
        Command::InitConfig => {
            if init_config(&config_path)? {
                eprintln!("Created {}", config_path.display());
            } else {
                eprintln!("Config already exists: {}", config_path.display());
            }
            Ok(())
        }
    }
}
