//! Host-side integration for the Ember kiln display
//!
//! Everything that needs `std`:
//!
//! - TOML configuration loading
//! - File-backed icon library with caching
//! - std clock, delay and cancellation adapters
//! - Ctrl+C and SIGTERM cancellation
//! - Periodic status updater
//! - Terminal and shared surfaces
//! - Icon, logo and pottery demos

pub mod config;
pub mod demo;
pub mod icons;
pub mod signal;
pub mod surface;
pub mod time;
pub mod updater;

pub use config::{ConfigError, HostConfig};
pub use icons::{IconError, IconLibrary};
pub use surface::{SharedSurface, TerminalSurface};
pub use time::{CancelFlag, Deadline, StdClock, StdDelay};
pub use updater::{ScriptedSource, SnapshotSource, StatusUpdater, UpdateError};
