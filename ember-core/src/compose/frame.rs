//! Declarative frames
//!
//! A [`Frame`] is an ordered list of draw operations. Composing it onto a
//! framebuffer never changes the frame, so one frame can be shown many
//! times (animation loops, periodic redraws).

use embedded_graphics::prelude::Point;
use heapless::{String, Vec};

use crate::icon::Bitmap;

/// Maximum draw operations per frame
pub const MAX_DRAW_OPS: usize = 16;

/// Maximum stored text length in bytes
///
/// Fits a 16-byte state label, `" - "` and twelve 4-byte characters.
pub const MAX_TEXT_LEN: usize = 64;

/// Text carried by a draw operation
pub type TextLine = String<MAX_TEXT_LEN>;

/// Frame building errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame already holds `MAX_DRAW_OPS` operations
    TooManyOps,
}

/// A single draw operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp<'a> {
    /// Text with its top-left corner at `position`
    Text {
        position: Point,
        text: TextLine,
        /// Characters beyond this are dropped when drawn
        max_length: usize,
    },
    /// Bitmap with its top-left corner at `position`
    Bitmap { position: Point, bitmap: &'a Bitmap },
}

impl DrawOp<'_> {
    /// The text that will actually be drawn, after truncation
    pub fn visible_text(&self) -> Option<&str> {
        match self {
            DrawOp::Text {
                text, max_length, ..
            } => Some(truncate_chars(text, *max_length)),
            DrawOp::Bitmap { .. } => None,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            DrawOp::Text { position, .. } | DrawOp::Bitmap { position, .. } => *position,
        }
    }
}

/// An ordered list of draw operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame<'a> {
    ops: Vec<DrawOp<'a>, MAX_DRAW_OPS>,
}

impl<'a> Frame<'a> {
    /// Create an empty frame
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Append a text operation
    ///
    /// Text longer than `MAX_TEXT_LEN` bytes is cut at a character boundary.
    pub fn push_text(
        &mut self,
        position: Point,
        text: &str,
        max_length: usize,
    ) -> Result<(), FrameError> {
        self.ops
            .push(DrawOp::Text {
                position,
                text: bounded_line(text),
                max_length,
            })
            .map_err(|_| FrameError::TooManyOps)
    }

    /// Append a bitmap operation
    pub fn push_bitmap(&mut self, position: Point, bitmap: &'a Bitmap) -> Result<(), FrameError> {
        self.ops
            .push(DrawOp::Bitmap { position, bitmap })
            .map_err(|_| FrameError::TooManyOps)
    }

    /// Builder-style [`push_bitmap`](Self::push_bitmap)
    pub fn with_bitmap(mut self, position: Point, bitmap: &'a Bitmap) -> Self {
        let _ = self.push_bitmap(position, bitmap);
        self
    }

    /// Builder-style [`push_text`](Self::push_text)
    pub fn with_text(mut self, position: Point, text: &str, max_length: usize) -> Self {
        let _ = self.push_text(position, text, max_length);
        self
    }

    pub fn ops(&self) -> &[DrawOp<'a>] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Full (untruncated) text of every text operation, in order
    pub fn text_lines(&self) -> Vec<&str, MAX_DRAW_OPS> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Bitmap { .. } => None,
            })
            .collect()
    }

    /// Text of every text operation as it will be drawn
    pub fn visible_lines(&self) -> Vec<&str, MAX_DRAW_OPS> {
        self.ops.iter().filter_map(|op| op.visible_text()).collect()
    }
}

/// Cut `text` to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Copy as much of `text` as fits in a `TextLine`
pub fn bounded_line(text: &str) -> TextLine {
    let mut line = TextLine::new();
    push_bounded(&mut line, text);
    line
}

/// Append whole characters of `text` until `line` is full
pub fn push_bounded(line: &mut TextLine, text: &str) {
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
}
