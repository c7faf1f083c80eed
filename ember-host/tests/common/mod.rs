//! Shared fixtures for host integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use ember_core::compose::Framebuffer;
use ember_core::traits::{Clock, DisplaySurface, SurfaceError};
use embedded_graphics::prelude::Size;
use embedded_hal::delay::DelayNs;

/// Surface that keeps every transmitted framebuffer
#[derive(Default)]
pub struct RecordingSurface {
    pub frames: Vec<Framebuffer>,
    /// Transmits to reject, by call number
    pub fail_on: Vec<usize>,
    calls: usize,
}

impl RecordingSurface {
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.to_vec(),
            ..Default::default()
        }
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_on.contains(&call) {
            return Err(SurfaceError::Communication);
        }
        self.frames.push(framebuffer.clone());
        Ok(())
    }

    fn dimensions(&self) -> Size {
        Size::new(128, 64)
    }
}

/// Fake time shared between a clock and a delay
#[derive(Clone, Default)]
pub struct FakeTime {
    ms: Rc<Cell<u64>>,
}

impl FakeTime {
    pub fn delay(&self) -> FakeDelay {
        FakeDelay(self.clone())
    }

    pub fn advance(&self, ms: u64) {
        self.ms.set(self.ms.get() + ms);
    }
}

impl Clock for FakeTime {
    fn now_ms(&self) -> u64 {
        self.ms.get()
    }
}

/// Delay that advances the fake clock instead of sleeping
pub struct FakeDelay(FakeTime);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(u64::from(ms));
    }
}

/// Path of the icons shipped with the repository
pub fn shipped_icons() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../images/hex")
}
