//! Animation sequences and the playback state machine

use alloc::vec::Vec;

use embedded_graphics::prelude::Point;

use crate::compose::Frame;
use crate::icon::Bitmap;

/// How a sequence repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackMode {
    /// `0..N-1` repeated until cancelled
    Loop,
    /// `0..N-1` once
    PlayOnce,
    /// `0..N-1` then `N-2..1`, repeated until cancelled
    PingPong,
    /// Like `Loop`, finishing at the first frame boundary after this many
    /// milliseconds
    TimeboxedLoop(u32),
}

/// Playback lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Not started
    Idle,
    /// A frame is on screen
    Playing,
    /// Cancelled externally
    Stopped,
    /// Ran to completion (play-once end or timebox expired)
    Finished,
}

/// Ordered `(frame, duration)` pairs plus a playback mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSequence<'a> {
    frames: Vec<(Frame<'a>, u32)>,
    mode: PlaybackMode,
}

impl<'a> AnimationSequence<'a> {
    pub fn new(mode: PlaybackMode) -> Self {
        Self {
            frames: Vec::new(),
            mode,
        }
    }

    /// One bitmap per frame, all shown for `duration_ms`
    ///
    /// `place` picks each bitmap's top-left corner.
    pub fn from_bitmaps<I, F>(bitmaps: I, duration_ms: u32, mode: PlaybackMode, place: F) -> Self
    where
        I: IntoIterator<Item = &'a Bitmap>,
        F: Fn(&Bitmap) -> Point,
    {
        let mut sequence = Self::new(mode);
        for bitmap in bitmaps {
            sequence.push(Frame::new().with_bitmap(place(bitmap), bitmap), duration_ms);
        }
        sequence
    }

    /// Append a frame shown for at least `duration_ms`
    pub fn push(&mut self, frame: Frame<'a>, duration_ms: u32) {
        self.frames.push((frame, duration_ms));
    }

    pub fn with_frame(mut self, frame: Frame<'a>, duration_ms: u32) -> Self {
        self.push(frame, duration_ms);
        self
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame and duration at `index`
    pub fn get(&self, index: usize) -> Option<(&Frame<'a>, u32)> {
        self.frames.get(index).map(|(frame, ms)| (frame, *ms))
    }

    /// Frame indices in play order
    pub fn order(&self) -> PlayOrder {
        PlayOrder::new(self.len(), self.mode)
    }
}

/// Frame indices in play order for a mode
///
/// Endless for every mode except [`PlaybackMode::PlayOnce`]; time limits
/// are enforced by the [`Sequencer`], not here.
#[derive(Debug, Clone)]
pub struct PlayOrder {
    len: usize,
    mode: PlaybackMode,
    step: usize,
}

impl PlayOrder {
    pub fn new(len: usize, mode: PlaybackMode) -> Self {
        Self { len, mode, step: 0 }
    }

    /// Steps before the order repeats
    pub fn cycle_len(&self) -> usize {
        match self.mode {
            PlaybackMode::PingPong if self.len > 1 => 2 * self.len - 2,
            _ => self.len,
        }
    }

    /// Frame index shown at `step`
    pub fn index_at(&self, step: usize) -> usize {
        let cycle = self.cycle_len();
        if cycle == 0 {
            return 0;
        }
        let pos = step % cycle;
        if pos < self.len {
            pos
        } else {
            // Backward leg of a ping-pong
            cycle - pos
        }
    }
}

impl Iterator for PlayOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.len == 0 || (self.mode == PlaybackMode::PlayOnce && self.step >= self.len) {
            return None;
        }
        let index = self.index_at(self.step);
        self.step += 1;
        Some(index)
    }
}

/// Playback state machine
///
/// Call [`start`](Self::start) once, then [`advance`](Self::advance) each
/// time the on-screen frame has been shown for its duration. Both return
/// the next frame index to draw, or `None` once playback is over.
#[derive(Debug, Clone)]
pub struct Sequencer {
    order: PlayOrder,
    state: PlaybackState,
    started_ms: u64,
    current: usize,
}

impl Sequencer {
    pub fn new(len: usize, mode: PlaybackMode) -> Self {
        Self {
            order: PlayOrder::new(len, mode),
            state: PlaybackState::Idle,
            started_ms: 0,
            current: 0,
        }
    }

    pub fn for_sequence(sequence: &AnimationSequence<'_>) -> Self {
        Self::new(sequence.len(), sequence.mode())
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the frame on screen
    pub fn current(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Playing => Some(self.current),
            _ => None,
        }
    }

    /// Begin playback at `now_ms`
    ///
    /// An empty sequence finishes immediately.
    pub fn start(&mut self, now_ms: u64) -> Option<usize> {
        if self.state != PlaybackState::Idle {
            return self.current();
        }
        self.started_ms = now_ms;
        self.step_to_next()
    }

    /// Move past the current frame
    ///
    /// `cancelled` is the cancellation signal sampled at this frame
    /// boundary; it takes priority over every other transition.
    pub fn advance(&mut self, now_ms: u64, cancelled: bool) -> Option<usize> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        if cancelled {
            self.state = PlaybackState::Stopped;
            return None;
        }
        if let PlaybackMode::TimeboxedLoop(total_ms) = self.order.mode {
            if now_ms.saturating_sub(self.started_ms) > u64::from(total_ms) {
                self.state = PlaybackState::Finished;
                return None;
            }
        }
        self.step_to_next()
    }

    /// Cancel before or during playback
    pub fn stop(&mut self) {
        if matches!(self.state, PlaybackState::Idle | PlaybackState::Playing) {
            self.state = PlaybackState::Stopped;
        }
    }

    fn step_to_next(&mut self) -> Option<usize> {
        match self.order.next() {
            Some(index) => {
                self.state = PlaybackState::Playing;
                self.current = index;
                Some(index)
            }
            None => {
                self.state = PlaybackState::Finished;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn take(len: usize, mode: PlaybackMode, n: usize) -> Vec<usize> {
        PlayOrder::new(len, mode).take(n).collect()
    }

    #[test]
    fn test_loop_order() {
        assert_eq!(take(3, PlaybackMode::Loop, 7), [0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_ping_pong_order() {
        let order = PlayOrder::new(5, PlaybackMode::PingPong);
        assert_eq!(order.cycle_len(), 8);
        assert_eq!(
            take(5, PlaybackMode::PingPong, 10),
            [0, 1, 2, 3, 4, 3, 2, 1, 0, 1]
        );
    }

    #[test]
    fn test_ping_pong_degenerate() {
        assert_eq!(take(1, PlaybackMode::PingPong, 3), [0, 0, 0]);
        assert_eq!(take(2, PlaybackMode::PingPong, 4), [0, 1, 0, 1]);
    }

    #[test]
    fn test_play_once_ends() {
        assert_eq!(take(3, PlaybackMode::PlayOnce, 10), [0, 1, 2]);
    }

    #[test]
    fn test_empty_order() {
        assert!(take(0, PlaybackMode::Loop, 3).is_empty());
    }

    #[test]
    fn test_sequencer_play_once() {
        let mut seq = Sequencer::new(2, PlaybackMode::PlayOnce);
        assert_eq!(seq.state(), PlaybackState::Idle);
        assert_eq!(seq.start(0), Some(0));
        assert_eq!(seq.state(), PlaybackState::Playing);
        assert_eq!(seq.advance(100, false), Some(1));
        assert_eq!(seq.advance(200, false), None);
        assert_eq!(seq.state(), PlaybackState::Finished);
        assert_eq!(seq.advance(300, false), None);
    }

    #[test]
    fn test_sequencer_cancel() {
        let mut seq = Sequencer::new(3, PlaybackMode::Loop);
        seq.start(0);
        assert_eq!(seq.advance(100, true), None);
        assert_eq!(seq.state(), PlaybackState::Stopped);
        assert_eq!(seq.current(), None);
    }

    #[test]
    fn test_sequencer_timebox() {
        let mut seq = Sequencer::new(2, PlaybackMode::TimeboxedLoop(1000));
        assert_eq!(seq.start(5000), Some(0));
        assert_eq!(seq.advance(5600, false), Some(1));
        // Exactly at the limit is not past it
        assert_eq!(seq.advance(6000, false), Some(0));
        assert_eq!(seq.advance(6001, false), None);
        assert_eq!(seq.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_sequencer_empty_finishes() {
        let mut seq = Sequencer::new(0, PlaybackMode::Loop);
        assert_eq!(seq.start(0), None);
        assert_eq!(seq.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_stop_before_start() {
        let mut seq = Sequencer::new(3, PlaybackMode::Loop);
        seq.stop();
        assert_eq!(seq.state(), PlaybackState::Stopped);
        assert_eq!(seq.advance(0, false), None);
    }

    #[test]
    fn test_from_bitmaps() {
        let icons = [Bitmap::new(8, 8), Bitmap::new(8, 8)];
        let seq = AnimationSequence::from_bitmaps(&icons, 150, PlaybackMode::PingPong, |b| {
            Point::new(64 - b.width() as i32 / 2, 0)
        });
        assert_eq!(seq.len(), 2);
        let (frame, ms) = seq.get(1).unwrap();
        assert_eq!(ms, 150);
        assert_eq!(frame.ops()[0].position(), Point::new(60, 0));
    }
}
