//! std-backed clock, delay and cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ember_core::traits::{CancelToken, Clock};
use embedded_hal::delay::DelayNs;

/// Monotonic clock starting at construction
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Blocking delay on the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Shareable cancellation flag
///
/// Clones share the flag; cancel from any thread, poll from the render
/// loop.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Re-arm for another run
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CancelToken for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// Cancels once a clock reaches a point in time
#[derive(Debug)]
pub struct Deadline<'a, C: ?Sized> {
    clock: &'a C,
    at_ms: u64,
}

impl<'a, C: Clock + ?Sized> Deadline<'a, C> {
    /// Deadline `ms` milliseconds from now
    pub fn after(clock: &'a C, ms: u32) -> Self {
        Self {
            clock,
            at_ms: clock.now_ms() + u64::from(ms),
        }
    }
}

impl<C: Clock + ?Sized> CancelToken for Deadline<'_, C> {
    fn is_cancelled(&self) -> bool {
        self.clock.now_ms() >= self.at_ms
    }
}
