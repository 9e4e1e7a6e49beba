//! Settings parser for .verpager/config.toml

use super::types::{Settings, MIN_PAGE_SIZE};
use std::path::Path;
use verpager_core::prelude::*;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const VERPAGER_DIR: &str = ".verpager";

/// Load settings from .verpager/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(VERPAGER_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match read_settings(&config_path) {
        Ok(settings) => {
            debug!("Loaded settings from {:?}", config_path);
            settings
        }
        Err(e) => {
            warn!("Failed to load {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

fn read_settings(config_path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(config_path)?;
    let mut settings: Settings = toml::from_str(&content)?;

    if settings.pager.page_size < MIN_PAGE_SIZE {
        warn!(
            "pager.page_size = {} in {:?} is too small, using {}",
            settings.pager.page_size, config_path, MIN_PAGE_SIZE
        );
        settings.pager.page_size = MIN_PAGE_SIZE;
    }
    Ok(settings)
}

/// Create a default config file in the .verpager/ directory
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let verpager_dir = project_path.join(VERPAGER_DIR);

    if !verpager_dir.exists() {
        std::fs::create_dir_all(&verpager_dir)
            .map_err(|e| Error::config(format!("Failed to create .verpager dir: {}", e)))?;
    }

    let config_path = verpager_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# Version Pager Configuration

[pager]
debounce_ms = 500       # Quiet period before a search is sent
page_size = 20          # Versions requested per page

[headless]
emit_timestamps = true  # Add a millisecond timestamp to NDJSON events
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    }

    Ok(())
}
