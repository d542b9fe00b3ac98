//! Configuration types for noteline.
//!
//! Every field has a default, so a partial (or empty) config file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::motion::MotionTiming;
use crate::timeline::WINDOW_SIZE;

/// Directory holding the config file and logs.
pub const CONFIG_DIR: &str = ".noteline";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration for noteline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the notes API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Number of notes requested around the current note.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Timeout for a single API request, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// UI tick interval in milliseconds (drives animation).
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Animation timings.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Glyph set used for icons.
    #[serde(default)]
    pub icons: IconStyle,

    /// Color palette.
    #[serde(default)]
    pub theme: ThemeName,
}

fn default_api_base_url() -> String {
    "http://localhost:2333/api/v2".into()
}

fn default_window_size() -> usize {
    WINDOW_SIZE
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_tick_rate_ms() -> u64 {
    50
}

/// Animation timings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Delay between entering sibling rows.
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    /// Row fade duration.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,

    /// Active indicator slide duration.
    #[serde(default = "default_indicator_ms")]
    pub indicator_ms: u64,
}

fn default_stagger_ms() -> u64 {
    500
}

fn default_fade_ms() -> u64 {
    300
}

fn default_indicator_ms() -> u64 {
    200
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_stagger_ms(),
            fade_ms: default_fade_ms(),
            indicator_ms: default_indicator_ms(),
        }
    }
}

/// Icon glyph set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconStyle {
    /// Nerd Font icons.
    Nerd,
    /// Standard Unicode symbols.
    #[default]
    Unicode,
    /// ASCII-only fallback.
    Ascii,
}

/// Color palette name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Mocha,
    Latte,
    HighContrast,
}

impl Config {
    /// Default config path under `root`.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// Animation timings for the timeline rows.
    pub fn motion_timing(&self) -> MotionTiming {
        MotionTiming {
            stagger: Duration::from_millis(self.motion.stagger_ms),
            fade: Duration::from_millis(self.motion.fade_ms),
            indicator: Duration::from_millis(self.motion.indicator_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            window_size: default_window_size(),
            request_timeout_seconds: default_request_timeout_seconds(),
            tick_rate_ms: default_tick_rate_ms(),
            motion: MotionConfig::default(),
            icons: IconStyle::default(),
            theme: ThemeName::default(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.icons, IconStyle::Unicode);
        assert_eq!(config.theme, ThemeName::Mocha);
        assert_eq!(config.motion_timing(), MotionTiming::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api_base_url":"https://notes.example/api","motion":{"fade_ms":120}}"#)
                .unwrap();
        assert_eq!(config.api_base_url, "https://notes.example/api");
        assert_eq!(config.window_size, 10);
        assert_eq!(config.motion.fade_ms, 120);
        assert_eq!(config.motion.stagger_ms, 500);
        assert_eq!(config.theme, ThemeName::Mocha);
    }

    #[test]
    fn test_theme_name_snake_case() {
        let config: Config = serde_json::from_str(r#"{"theme":"high_contrast"}"#).unwrap();
        assert_eq!(config.theme, ThemeName::HighContrast);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::default_path(dir.path());

        let config = Config {
            window_size: 6,
            icons: IconStyle::Ascii,
            theme: ThemeName::HighContrast,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
