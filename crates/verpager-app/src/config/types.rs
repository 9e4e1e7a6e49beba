//! Configuration types for the version pager
//!
//! Defines:
//! - `Settings` - Global application settings
//! - `PagerSettings` - Search debounce and paging
//! - `HeadlessSettings` - NDJSON output options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest page size a store is ever asked for
pub const MIN_PAGE_SIZE: u32 = 1;

/// Application settings (.verpager/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub pager: PagerSettings,

    #[serde(default)]
    pub headless: HeadlessSettings,
}

/// Version pager settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PagerSettings {
    /// Quiescence window for search input, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PagerSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
        }
    }
}

impl PagerSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Page size sent to the store; never below [`MIN_PAGE_SIZE`]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(MIN_PAGE_SIZE)
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_page_size() -> u32 {
    20
}

/// Headless (NDJSON) output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeadlessSettings {
    /// Include a millisecond timestamp on every emitted event
    #[serde(default = "default_true")]
    pub emit_timestamps: bool,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            emit_timestamps: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.pager.debounce_ms, 500);
        assert_eq!(settings.pager.page_size, 20);
        assert!(settings.headless.emit_timestamps);
    }

    #[test]
    fn test_partial_pager_section() {
        let settings: Settings = toml::from_str("[pager]\npage_size = 5\n").unwrap();
        assert_eq!(settings.pager.page_size, 5);
        assert_eq!(settings.pager.debounce_ms, 500);
    }

    #[test]
    fn test_debounce_duration() {
        let pager = PagerSettings {
            debounce_ms: 250,
            ..Default::default()
        };
        assert_eq!(pager.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let pager = PagerSettings {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(pager.effective_page_size(), 1);
        assert_eq!(PagerSettings::default().effective_page_size(), 20);
    }
}
