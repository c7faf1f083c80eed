//! Display configuration
//!
//! Passed explicitly to the renderer and decoder at construction instead of
//! being read from globals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::icon::{DEFAULT_ICON_HEIGHT, DEFAULT_ICON_WIDTH};

/// Temperature scale used for display formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TempScale {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "f", alias = "F"))]
    Fahrenheit,
    #[cfg_attr(feature = "serde", serde(rename = "c", alias = "C"))]
    Celsius,
}

impl TempScale {
    /// Unit suffix including the degree sign
    pub const fn unit(self) -> &'static str {
        match self {
            TempScale::Fahrenheit => "°F",
            TempScale::Celsius => "°C",
        }
    }
}

/// Display hardware and layout configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Render calls are no-ops when false
    pub enabled: bool,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// I2C address of the controller chip
    pub i2c_address: u8,
    /// I2C bus number
    pub i2c_port: u8,
    /// Temperature scale for status lines
    pub temp_scale: TempScale,
    /// Status redraw period (ms)
    pub update_interval_ms: u32,
    /// Vertical distance between status lines (pixels)
    pub line_height: u32,
    /// Characters drawn per line before truncation
    pub max_line_chars: usize,
    /// Characters of profile name shown in the state line
    pub profile_chars: usize,
    /// Icon width used when a source has no dimension comment
    pub icon_width: u32,
    /// Icon height used when a source has no dimension comment
    pub icon_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 128,
            height: 64,
            i2c_address: 0x3C,
            i2c_port: 1,
            temp_scale: TempScale::Fahrenheit,
            update_interval_ms: 2000,
            line_height: 12,
            max_line_chars: 21,
            profile_chars: 12,
            icon_width: DEFAULT_ICON_WIDTH,
            icon_height: DEFAULT_ICON_HEIGHT,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigIssue {
    /// Width or height is zero
    ZeroSize,
    /// `max_line_chars` is zero
    ZeroLineLength,
    /// `line_height` is zero
    ZeroLineHeight,
    /// Default icon size is zero
    ZeroIconSize,
}

impl DisplayConfig {
    /// Check the configuration for values the renderer can't use
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigIssue::ZeroSize);
        }
        if self.max_line_chars == 0 {
            return Err(ConfigIssue::ZeroLineLength);
        }
        if self.line_height == 0 {
            return Err(ConfigIssue::ZeroLineHeight);
        }
        if self.icon_width == 0 || self.icon_height == 0 {
            return Err(ConfigIssue::ZeroIconSize);
        }
        Ok(())
    }

    /// Number of text lines that fit on screen
    pub fn text_rows(&self) -> u32 {
        self.height / self.line_height.max(1)
    }
}
