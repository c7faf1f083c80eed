//! Text rasterization
//!
//! Glyph shaping is a pluggable capability; the composer only decides what
//! text goes where and how long it may be.

use embedded_graphics::mono_font::{iso_8859_1::FONT_6X10, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Drawable, Point};
use embedded_graphics::text::{Baseline, Text};

use super::framebuffer::Framebuffer;

/// Draws strings into a framebuffer
pub trait TextRasterizer {
    /// Draw `text` with its top-left corner at `position`
    ///
    /// Glyphs falling outside the framebuffer are clipped.
    fn draw_text(&self, target: &mut Framebuffer, position: Point, text: &str);

    /// Width of `text` in pixels
    fn text_width(&self, text: &str) -> u32;
}

/// Monospaced bitmap font rasterizer
///
/// Defaults to a 6x10 Latin-1 font, which covers the degree sign and fits
/// 21 characters across a 128 pixel display.
#[derive(Clone, Copy)]
pub struct MonoText {
    font: &'static MonoFont<'static>,
}

impl MonoText {
    pub const fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    /// Advance per character, including spacing
    pub fn char_width(&self) -> u32 {
        self.font.character_size.width + self.font.character_spacing
    }
}

impl Default for MonoText {
    fn default() -> Self {
        Self::new(&FONT_6X10)
    }
}

impl TextRasterizer for MonoText {
    fn draw_text(&self, target: &mut Framebuffer, position: Point, text: &str) {
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        // Framebuffer drawing is infallible
        let _ = Text::with_baseline(text, position, style, Baseline::Top).draw(target);
    }

    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.char_width()
    }
}
