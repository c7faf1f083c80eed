//! Board-agnostic display core for the kiln controller
//!
//! Everything between "here is the kiln state" and "here is a framebuffer
//! for the panel":
//!
//! - Hex-text icon codec
//! - Frame composition onto a display-sized framebuffer
//! - Timed animation playback (loop, once, ping-pong, time-boxed)
//! - Status screen layout
//! - Display surface and timing traits
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod animation;
pub mod compose;
pub mod config;
pub mod icon;
pub mod render;
pub mod status;
pub mod traits;

pub use render::{Canvas, Display, RenderError};
