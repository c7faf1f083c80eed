//! Icon codec
//!
//! Converts human-authored hex-text bitmaps into [`Bitmap`]s and back.

pub mod bitmap;
pub mod decode;
pub mod encode;

pub use bitmap::Bitmap;
pub use decode::{
    decode, decode_sheet, decode_with_report, parse_dimensions, split_sheet, DecodeReport,
    HexTokens, DEFAULT_ICON_HEIGHT, DEFAULT_ICON_WIDTH, SHEET_DELIMITER,
};
pub use encode::encode_hex;

/// Named status icons shipped with the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusIcon {
    /// Heating
    Flame,
    /// Cooling
    Snowflake,
    /// Stopped or faulted
    StopSign,
    /// Paused / waiting
    Clock,
}

impl StatusIcon {
    /// All status icons
    pub const ALL: [StatusIcon; 4] = [
        StatusIcon::Flame,
        StatusIcon::Snowflake,
        StatusIcon::StopSign,
        StatusIcon::Clock,
    ];

    /// Icon file stem (`<name>.hex`)
    pub const fn name(self) -> &'static str {
        match self {
            StatusIcon::Flame => "flame",
            StatusIcon::Snowflake => "snowflake",
            StatusIcon::StopSign => "stop_sign",
            StatusIcon::Clock => "clock",
        }
    }
}
