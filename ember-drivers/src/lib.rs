//! Display surface implementations
//!
//! Concrete implementations of the `DisplaySurface` trait defined in
//! ember-core:
//!
//! - SSD1309 / SH1106 page-addressed OLEDs over I2C

#![no_std]
#![deny(unsafe_code)]

pub mod display;
