//! Periodic status updater
//!
//! Redraws the status screen every `update_interval_ms` from whatever the
//! kiln controller reports. A failed cycle is logged and the loop carries
//! on; cancellation is polled between cycles.

use std::convert::Infallible;
use std::fmt;

use ember_core::compose::TextRasterizer;
use ember_core::status::StatusSnapshot;
use ember_core::traits::{CancelToken, DisplaySurface};
use ember_core::{Display, RenderError};
use embedded_hal::delay::DelayNs;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Startup banner text
pub const BANNER: &str = "Kiln Controller";
/// Line the banner is shown on
pub const BANNER_LINE: u32 = 2;
/// How long the banner stays up (ms)
pub const BANNER_MS: u32 = 1000;

/// Supplies one status snapshot per update cycle
pub trait SnapshotSource {
    type Error: fmt::Display;

    fn snapshot(&mut self) -> Result<StatusSnapshot, Self::Error>;
}

impl<F> SnapshotSource for F
where
    F: FnMut() -> StatusSnapshot,
{
    type Error = Infallible;

    fn snapshot(&mut self) -> Result<StatusSnapshot, Infallible> {
        Ok(self())
    }
}

/// Cycles through a fixed list of snapshots
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    snapshots: Vec<StatusSnapshot>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(snapshots: Vec<StatusSnapshot>) -> Self {
        Self { snapshots, next: 0 }
    }
}

/// A script with nothing in it
#[derive(Debug, Error)]
#[error("no snapshots scripted")]
pub struct EmptyScript;

impl SnapshotSource for ScriptedSource {
    type Error = EmptyScript;

    fn snapshot(&mut self) -> Result<StatusSnapshot, EmptyScript> {
        if self.snapshots.is_empty() {
            return Err(EmptyScript);
        }
        let snapshot = self.snapshots[self.next % self.snapshots.len()].clone();
        self.next += 1;
        Ok(snapshot)
    }
}

/// A single update cycle failed
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("status source failed: {0}")]
    Source(String),

    #[error("render cycle failed: {0:?}")]
    Render(RenderError),
}

impl From<RenderError> for UpdateError {
    fn from(e: RenderError) -> Self {
        UpdateError::Render(e)
    }
}

/// Drives a display from a snapshot source on a fixed cadence
pub struct StatusUpdater<S, Src, D, T = ember_core::compose::MonoText> {
    display: Display<S, T>,
    source: Src,
    delay: D,
    interval_ms: u32,
}

impl<S, Src, D, T> StatusUpdater<S, Src, D, T>
where
    S: DisplaySurface,
    Src: SnapshotSource,
    D: DelayNs,
    T: TextRasterizer,
{
    /// Updater using the display's configured interval
    pub fn new(display: Display<S, T>, source: Src, delay: D) -> Self {
        let interval_ms = display.config().update_interval_ms;
        Self {
            display,
            source,
            delay,
            interval_ms,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn display(&self) -> &Display<S, T> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<S, T> {
        &mut self.display
    }

    pub fn into_display(self) -> Display<S, T> {
        self.display
    }

    /// Show the startup banner and hold it for a second
    ///
    /// Skipped when the display is inactive.
    pub fn banner(&mut self) -> Result<(), UpdateError> {
        if !self.display.is_active() {
            warn!("Display not initialized, updater will not update display");
            return Ok(());
        }
        self.display.show_message(BANNER, BANNER_LINE)?;
        self.delay.delay_ms(BANNER_MS);
        info!("Display updater initialized");
        Ok(())
    }

    /// Read one snapshot and render it
    pub fn tick(&mut self) -> Result<(), UpdateError> {
        if !self.display.is_active() {
            return Ok(());
        }
        let snapshot = self
            .source
            .snapshot()
            .map_err(|e| UpdateError::Source(e.to_string()))?;
        self.display.update(&snapshot)?;
        debug!(state = snapshot.state.label(), "Status redrawn");
        Ok(())
    }

    /// Update every interval until cancelled; returns the cycles run
    ///
    /// A failed cycle is logged and does not end the loop.
    pub fn run<K: CancelToken + ?Sized>(&mut self, cancel: &K) -> usize {
        let mut cycles = 0;
        while !cancel.is_cancelled() {
            if let Err(e) = self.tick() {
                error!(error = %e, "Error in display updater");
            }
            cycles += 1;
            self.delay.delay_ms(self.interval_ms);
        }
        info!(cycles, "Display updater stopped");
        cycles
    }
}
