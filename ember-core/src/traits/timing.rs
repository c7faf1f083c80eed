//! Time and cancellation sources for pacing loops
//!
//! Blocking waits go through `embedded_hal::delay::DelayNs`; these traits
//! cover the remaining two inputs a pacing loop needs.

use core::sync::atomic::{AtomicBool, Ordering};

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Cooperative cancellation signal, polled at frame boundaries
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: CancelToken + ?Sized> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Cancelled as soon as either token is
impl<A: CancelToken, B: CancelToken> CancelToken for (A, B) {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled() || self.1.is_cancelled()
    }
}

/// A token that is never cancelled
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_token_cancels_pair() {
        let a = AtomicBool::new(false);
        let b = AtomicBool::new(false);
        assert!(!(&a, &b).is_cancelled());
        b.store(true, Ordering::Release);
        assert!((&a, &b).is_cancelled());
        assert!(!(NeverCancel, &a).is_cancelled());
    }
}
