//! Scheduler configuration.
//!
//! Settings for the self-driving loop, loadable from a TOML file as an
//! alternative to hardcoding them at the call site. Missing fields fall
//! back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Errors from loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a scheduler and its optional driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Stepping interval of the self-driving loop in milliseconds.
    pub frame_interval_ms: f64,
    /// Whether adding a tween to an idle shared scheduler starts the loop.
    pub auto_play: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16.0,
            auto_play: true,
        }
    }
}

impl SchedulerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load from a TOML file, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|err| {
            warn!(?err, "failed to load scheduler config, using defaults");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.frame_interval_ms, 16.0);
        assert!(config.auto_play);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = SchedulerConfig::from_toml_str("frame_interval_ms = 8.0").unwrap();
        assert_eq!(config.frame_interval_ms, 8.0);
        assert!(config.auto_play);

        let config = SchedulerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_full_round_trip() {
        let config = SchedulerConfig {
            frame_interval_ms: 33.0,
            auto_play: false,
        };
        let toml = toml::to_string(&config).unwrap();
        let parsed = SchedulerConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(SchedulerConfig::from_toml_str("frame_interval_ms = \"fast\"").is_err());
    }
}
