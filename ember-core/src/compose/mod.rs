//! Frame composition
//!
//! Draws [`Frame`]s onto a display-sized [`Framebuffer`]:
//! - Text is cut to its `max_length` (no wrapping, no scrolling) and handed
//!   to a [`TextRasterizer`]
//! - Bitmaps paste their lit pixels at an offset, clipped at the edges
//! - [`fit_to_screen`] scales and centres an arbitrary icon on the display

pub mod frame;
pub mod framebuffer;
pub mod geometry;
pub mod text;

pub use frame::{
    push_bounded, truncate_chars, DrawOp, Frame, FrameError, TextLine, MAX_DRAW_OPS, MAX_TEXT_LEN,
};
pub use framebuffer::Framebuffer;
pub use geometry::{center, scale_to_fit};
pub use text::{MonoText, TextRasterizer};

use embedded_graphics::prelude::Point;

use crate::icon::Bitmap;

/// Draw every operation of `frame` onto `framebuffer`, in order
///
/// The framebuffer is not cleared first; later operations draw over earlier
/// ones.
pub fn compose<T>(framebuffer: &mut Framebuffer, frame: &Frame<'_>, text: &T)
where
    T: TextRasterizer + ?Sized,
{
    for op in frame.ops() {
        match op {
            DrawOp::Text {
                position,
                text: line,
                max_length,
            } => draw_text(framebuffer, *position, line, *max_length, text),
            DrawOp::Bitmap { position, bitmap } => draw_bitmap(framebuffer, *position, bitmap),
        }
    }
}

/// Draw the lit pixels of `bitmap` at `position`, clipping at the edges
pub fn draw_bitmap(framebuffer: &mut Framebuffer, position: Point, bitmap: &Bitmap) {
    framebuffer.draw_bitmap(position, bitmap);
}

/// Draw at most `max_length` characters of `line` at `position`
pub fn draw_text<T>(
    framebuffer: &mut Framebuffer,
    position: Point,
    line: &str,
    max_length: usize,
    text: &T,
) where
    T: TextRasterizer + ?Sized,
{
    // Text starting past the right or bottom edge can't reach the screen
    let past_edge = i64::from(position.x) >= i64::from(framebuffer.width())
        || i64::from(position.y) >= i64::from(framebuffer.height());
    let visible = truncate_chars(line, max_length);
    if !visible.is_empty() && !past_edge {
        text.draw_text(framebuffer, position, visible);
    }
}

/// Render `bitmap` as a full-screen image
///
/// The source is scaled (nearest neighbour, aspect preserved) only when it
/// exceeds the screen in either dimension, then pasted centred on an
/// all-unlit framebuffer.
pub fn fit_to_screen(bitmap: &Bitmap, width: u32, height: u32) -> Framebuffer {
    let mut framebuffer = Framebuffer::new(width, height);

    let scaled;
    let source = if bitmap.width() > width || bitmap.height() > height {
        let size = scale_to_fit(bitmap.width(), bitmap.height(), width, height);
        scaled = bitmap.resized(size.width, size.height);
        &scaled
    } else {
        bitmap
    };

    let offset = center(width, height, source.width(), source.height());
    framebuffer.draw_bitmap(offset, source);
    framebuffer
}
