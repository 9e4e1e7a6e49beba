//! Configuration file parsing for the version pager
//!
//! Supports:
//! - `.verpager/config.toml` - Global settings

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, CONFIG_FILENAME, VERPAGER_DIR};
pub use types::*;
