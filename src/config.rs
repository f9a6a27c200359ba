//! # Configuration Management
//!
//! This module handles loading and saving configuration from the moon-config.toml
//! file. It controls how phase times are printed, which phases the calendar lists,
//! and the size of the illumination chart.
//!
//! Every section and field has a default, so a partial file only overrides what it
//! names. A missing or unreadable file falls back to the defaults with a warning.

use crate::phase::PhaseKind;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "moon-config.toml";

/// Errors raised while writing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration loaded from moon-config.toml
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// How phase times are printed
    pub output: OutputConfig,
    /// Which phases are listed and how many
    pub calendar: CalendarConfig,
    /// ASCII illumination chart layout
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print times in this offset from UTC, in minutes. When unset, times keep the
    /// offset of the anchor instant.
    pub utc_offset_minutes: Option<i32>,
    /// `chrono` format string for printed times
    pub time_format: String,
    /// Emit JSON instead of text
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Phases to list, e.g. `["new", "full"]`
    pub phases: Vec<PhaseKind>,
    /// Number of events to print
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Days shown before and after the anchor
    pub days_each_side: i64,
    /// Chart height in text rows
    pub rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            utc_offset_minutes: None,
            time_format: "%Y-%m-%d %H:%M %:z".to_string(),
            json: false,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            phases: PhaseKind::ALL.to_vec(),
            count: 4,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            days_each_side: 15,
            rows: 11,
        }
    }
}

impl Config {
    /// Load configuration from moon-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), "invalid config file format: {e}");
                    warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration to moon-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

impl OutputConfig {
    /// The configured output offset, if any. Offsets of a day or more are ignored.
    pub fn offset(&self) -> Option<FixedOffset> {
        let minutes = self.utc_offset_minutes?;
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt);
        if offset.is_none() {
            warn!(minutes, "utc_offset_minutes out of range, ignoring");
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.utc_offset_minutes, None);
        assert!(!config.output.json);
        assert_eq!(config.calendar.phases, PhaseKind::ALL.to_vec());
        assert_eq!(config.calendar.count, 4);
        assert_eq!(config.chart.days_each_side, 15);
        assert_eq!(config.chart.rows, 11);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.output.utc_offset_minutes = Some(-300);
        config.calendar.phases = vec![PhaseKind::Full];

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [calendar]
            phases = ["new", "full"]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.calendar.phases, vec![PhaseKind::New, PhaseKind::Full]);
        assert_eq!(parsed.calendar.count, 4);
        assert_eq!(parsed.output, OutputConfig::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[calendar]\nphases = [\"gibbous\"]\n").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.output.json = true;
        config.chart.rows = 7;

        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_output_offset() {
        let mut output = OutputConfig::default();
        assert_eq!(output.offset(), None);

        output.utc_offset_minutes = Some(660);
        assert_eq!(output.offset(), FixedOffset::east_opt(11 * 3600));

        output.utc_offset_minutes = Some(24 * 60);
        assert_eq!(output.offset(), None);
    }
}
