//! Configuration file parsing for Tempo
//!
//! Settings live in `<config_dir>/tempo/config.toml` unless the host passes
//! an explicit path.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, init_config, load_settings, save_settings};
pub use types::*;
