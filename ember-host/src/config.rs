//! Host configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! icon_dir = "images/hex"
//!
//! [display]
//! width = 128
//! height = 64
//! i2c_address = 0x3C
//! temp_scale = "f"
//! ```
//!
//! Missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use ember_core::config::{ConfigIssue, DisplayConfig};
use serde::Deserialize;
use thiserror::Error;

/// Default icon directory, relative to the working directory
pub const DEFAULT_ICON_DIR: &str = "images/hex";

/// Errors loading host configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid display config: {0:?}")]
    Invalid(ConfigIssue),
}

/// Everything the host side needs to drive a display
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory holding `<name>.hex` icon files
    pub icon_dir: PathBuf,
    pub display: DisplayConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            icon_dir: PathBuf::from(DEFAULT_ICON_DIR),
            display: DisplayConfig::default(),
        }
    }
}

impl HostConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text)?;
        if config.icon_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.icon_dir = parent.join(&config.icon_dir);
            }
        }
        Ok(config)
    }

    /// Parse and validate config text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.display.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::config::TempScale;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = HostConfig::parse("").unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_partial_display_table() {
        let config = HostConfig::parse(
            r#"
            icon_dir = "/opt/kiln/icons"

            [display]
            i2c_address = 0x3D
            temp_scale = "C"
            "#,
        )
        .unwrap();
        assert_eq!(config.icon_dir, PathBuf::from("/opt/kiln/icons"));
        assert_eq!(config.display.i2c_address, 0x3D);
        assert_eq!(config.display.temp_scale, TempScale::Celsius);
        assert_eq!(config.display.width, 128);
        assert_eq!(config.display.update_interval_ms, 2000);
    }

    #[test]
    fn test_invalid_display_rejected() {
        let err = HostConfig::parse("[display]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ConfigIssue::ZeroSize)));
    }

    #[test]
    fn test_parse_error() {
        let err = HostConfig::parse("[display\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
