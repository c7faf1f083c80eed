//! Blocking animation playback

use embedded_hal::delay::DelayNs;

use super::sequence::{AnimationSequence, PlaybackState, Sequencer};
use crate::compose::TextRasterizer;
use crate::render::{Display, RenderError};
use crate::traits::{CancelToken, Clock, DisplaySurface};

/// Play `sequence` on `display`, blocking until it ends
///
/// Each frame is composed, transmitted, then held for its duration with
/// `delay`. Cancellation is polled only between frames: a frame that has
/// started is always drawn and held in full, and the last frame stays on
/// screen afterwards.
///
/// Returns the final state ([`PlaybackState::Stopped`] or
/// [`PlaybackState::Finished`]). A failed transmit stops playback and is
/// returned as the error.
pub fn play<S, T, D, C, K>(
    display: &mut Display<S, T>,
    sequence: &AnimationSequence<'_>,
    delay: &mut D,
    clock: &C,
    cancel: &K,
) -> Result<PlaybackState, RenderError>
where
    S: DisplaySurface,
    T: TextRasterizer,
    D: DelayNs,
    C: Clock + ?Sized,
    K: CancelToken + ?Sized,
{
    let mut sequencer = Sequencer::for_sequence(sequence);
    if cancel.is_cancelled() {
        sequencer.stop();
        return Ok(sequencer.state());
    }

    debug!("Animation start: {} frames", sequence.len());
    let mut next = sequencer.start(clock.now_ms());
    while let Some(index) = next {
        let Some((frame, duration_ms)) = sequence.get(index) else {
            break;
        };
        if let Err(e) = display.render(frame) {
            sequencer.stop();
            return Err(e);
        }
        delay.delay_ms(duration_ms);
        next = sequencer.advance(clock.now_ms(), cancel.is_cancelled());
    }

    debug!("Animation ended");
    Ok(sequencer.state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::PlaybackMode;
    use crate::compose::Frame;
    use crate::config::DisplayConfig;
    use crate::icon::Bitmap;
    use crate::render::tests::RecordingSurface;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use embedded_graphics::prelude::Point;

    /// Shared fake time: delays advance the clock
    #[derive(Default)]
    struct FakeTime {
        ns: Cell<u64>,
    }

    impl Clock for FakeTime {
        fn now_ms(&self) -> u64 {
            self.ns.get() / 1_000_000
        }
    }

    struct FakeDelay<'a>(&'a FakeTime);

    impl DelayNs for FakeDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.ns.set(self.0.ns.get() + u64::from(ns));
        }
    }

    /// Cancelled once the fake clock reaches `at_ms`
    struct CancelAt<'a> {
        time: &'a FakeTime,
        at_ms: u64,
    }

    impl CancelToken for CancelAt<'_> {
        fn is_cancelled(&self) -> bool {
            self.time.now_ms() >= self.at_ms
        }
    }

    struct Fixture {
        pixel: Bitmap,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                pixel: Bitmap::from_packed(1, 1, &[0x80]),
            }
        }

        /// Frame `i` lights pixel `(i, 0)`
        fn sequence(&self, frames: usize, ms: u32, mode: PlaybackMode) -> AnimationSequence<'_> {
            let mut seq = AnimationSequence::new(mode);
            for i in 0..frames {
                seq.push(Frame::new().with_bitmap(Point::new(i as i32, 0), &self.pixel), ms);
            }
            seq
        }
    }

    fn shown(surface: &RecordingSurface) -> Vec<usize> {
        surface
            .frames
            .iter()
            .map(|fb| (0..128).position(|x| fb.pixel(x, 0)).unwrap())
            .collect()
    }

    #[test]
    fn test_play_once() {
        let fixture = Fixture::new();
        let seq = fixture.sequence(3, 100, PlaybackMode::PlayOnce);
        let time = FakeTime::default();
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());

        let state = play(
            &mut display,
            &seq,
            &mut FakeDelay(&time),
            &time,
            &crate::traits::NeverCancel,
        )
        .unwrap();

        assert_eq!(state, PlaybackState::Finished);
        assert_eq!(shown(display.surface()), [0, 1, 2]);
        assert_eq!(time.now_ms(), 300);
    }

    #[test]
    fn test_ping_pong_until_cancelled() {
        let fixture = Fixture::new();
        let seq = fixture.sequence(5, 150, PlaybackMode::PingPong);
        let time = FakeTime::default();
        let cancel = CancelAt {
            time: &time,
            at_ms: 150 * 10,
        };
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());

        let state = play(&mut display, &seq, &mut FakeDelay(&time), &time, &cancel).unwrap();

        assert_eq!(state, PlaybackState::Stopped);
        assert_eq!(
            shown(display.surface()),
            [0, 1, 2, 3, 4, 3, 2, 1, 0, 1]
        );
        // Last frame left on screen
        assert_eq!(display.surface().clears, 0);
    }

    #[test]
    fn test_timebox_finishes_frame_in_progress() {
        let fixture = Fixture::new();
        let seq = fixture.sequence(2, 300, PlaybackMode::TimeboxedLoop(1000));
        let time = FakeTime::default();
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());

        let state = play(
            &mut display,
            &seq,
            &mut FakeDelay(&time),
            &time,
            &crate::traits::NeverCancel,
        )
        .unwrap();

        assert_eq!(state, PlaybackState::Finished);
        assert_eq!(shown(display.surface()), [0, 1, 0, 1]);
        assert_eq!(time.now_ms(), 1200);
    }

    #[test]
    fn test_cancelled_before_start_draws_nothing() {
        let fixture = Fixture::new();
        let seq = fixture.sequence(3, 100, PlaybackMode::Loop);
        let time = FakeTime::default();
        let cancel = CancelAt {
            time: &time,
            at_ms: 0,
        };
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());

        let state = play(&mut display, &seq, &mut FakeDelay(&time), &time, &cancel).unwrap();

        assert_eq!(state, PlaybackState::Stopped);
        assert!(display.surface().frames.is_empty());
    }

    #[test]
    fn test_render_failure_stops_playback() {
        let fixture = Fixture::new();
        let seq = fixture.sequence(3, 100, PlaybackMode::Loop);
        let time = FakeTime::default();
        let surface = RecordingSurface {
            fail: true,
            ..Default::default()
        };
        let mut display = Display::new(surface, DisplayConfig::default());

        let result = play(
            &mut display,
            &seq,
            &mut FakeDelay(&time),
            &time,
            &crate::traits::NeverCancel,
        );

        assert!(result.is_err());
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn test_empty_sequence() {
        let time = FakeTime::default();
        let seq = AnimationSequence::new(PlaybackMode::Loop);
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());

        let state = play(
            &mut display,
            &seq,
            &mut FakeDelay(&time),
            &time,
            &crate::traits::NeverCancel,
        )
        .unwrap();

        assert_eq!(state, PlaybackState::Finished);
        assert!(display.surface().frames.is_empty());
    }
}
