//! Settings loading and saving for config.toml

use super::types::Settings;
use fs2::FileExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempo_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const TEMPO_DIR: &str = "tempo";

/// Default settings location: `<config_dir>/tempo/config.toml`
pub fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(TEMPO_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `path`
///
/// A missing, unreadable, or invalid file yields the defaults.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Write settings to `path`, creating parent directories as needed
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let content = format!("{}{}", generate_config_header(), toml::to_string_pretty(settings)?);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::config(format!("Failed to open {:?}: {}", path, e)))?;

    // Released when the file is dropped
    file.lock_exclusive()
        .map_err(|e| Error::config(format!("Failed to lock {:?}: {}", path, e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write {:?}: {}", path, e)))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush {:?}: {}", path, e)))?;

    info!("Saved settings to {:?}", path);
    Ok(())
}

/// Write a default config file unless one already exists
///
/// Returns `true` if a file was created.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        debug!("Config already exists at {:?}", path);
        return Ok(false);
    }

    save_settings(path, &Settings::default())
        .with_context(|| format!("Failed to initialize config at {:?}", path))?;
    Ok(true)
}

fn generate_config_header() -> String {
    r#"# Tempo configuration
#
# [analytics] enabled      - record lifecycle signals
# [storage]   backend      - "file" or "memory"
#             scope        - application or app-group scope for the device id
#             directory    - base directory for the file backend
# [device]    os_version / model - override platform metadata

"#
    .to_string()
}
