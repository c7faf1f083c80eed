//! Display-sized render target

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};

use crate::icon::Bitmap;

/// Mutable 1-bit pixel buffer sized to the physical display
///
/// Row-major, MSB-first within each byte. Writes outside the buffer are
/// clipped, never wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Framebuffer {
    /// Create an all-unlit framebuffer
    pub fn new(width: u32, height: u32) -> Self {
        let bits = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![0; bits.div_ceil(8)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Unlight every pixel
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Read a pixel; out-of-range reads are unlit
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(i) => self.data[i / 8] & (0x80u8 >> (i % 8)) != 0,
            None => false,
        }
    }

    /// Write a pixel; out-of-range writes are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, lit: bool) {
        if let Some(i) = self.index(x, y) {
            let mask = 0x80u8 >> (i % 8);
            if lit {
                self.data[i / 8] |= mask;
            } else {
                self.data[i / 8] &= !mask;
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Paste the lit pixels of a bitmap with its top-left at `position`
    ///
    /// Unlit bitmap pixels leave the framebuffer untouched.
    pub fn draw_bitmap(&mut self, position: Point, bitmap: &Bitmap) {
        for (x, y) in bitmap.lit_pixels() {
            let px = position.x.saturating_add(x as i32);
            let py = position.y.saturating_add(y as i32);
            self.set_pixel(px, py, true);
        }
    }

    /// Number of lit pixels
    pub fn count_lit(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Raw row-major packed pixels
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of 8-pixel-tall pages (SSD130x addressing)
    pub fn pages(&self) -> u32 {
        self.height.div_ceil(8)
    }

    /// Pack one page into column bytes, LSB at the top row
    ///
    /// Writes `min(width, buf.len())` bytes.
    pub fn page_into(&self, page: u32, buf: &mut [u8]) {
        let top = (page * 8) as i32;
        for (x, out) in buf.iter_mut().take(self.width as usize).enumerate() {
            let mut byte = 0u8;
            for bit in 0..8 {
                if self.pixel(x as i32, top + bit) {
                    byte |= 1u8 << bit;
                }
            }
            *out = byte;
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
