//! Frame animation
//!
//! Sequences frames into timed animations. [`Sequencer`] is the pure state
//! machine deciding which frame comes next; [`play`] drives it against a
//! display with blocking delays, polling cancellation between frames.

pub mod player;
pub mod sequence;

pub use player::play;
pub use sequence::{AnimationSequence, PlaybackMode, PlaybackState, PlayOrder, Sequencer};
