//! OLED display surfaces

pub mod oled;

pub use oled::{Controller, Oled};
