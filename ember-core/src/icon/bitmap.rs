//! Decoded monochrome bitmap

use alloc::vec;
use alloc::vec::Vec;

/// A fixed-size monochrome pixel grid
///
/// Pixels are stored as a packed bit stream, most significant bit first,
/// row-major with no per-row padding. Bit `i` is pixel
/// `(i % width, i / width)`; a set bit is a lit pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    /// Packed pixel bits, `ceil(width * height / 8)` bytes
    data: Vec<u8>,
}

impl Bitmap {
    /// Create an all-unlit bitmap
    pub fn new(width: u32, height: u32) -> Self {
        let bits = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![0; bits.div_ceil(8)],
        }
    }

    /// Build a bitmap from packed MSB-first bytes
    ///
    /// Short input leaves the tail unlit, extra bytes are ignored.
    pub fn from_packed(width: u32, height: u32, bytes: &[u8]) -> Self {
        let mut bitmap = Self::new(width, height);
        let n = bitmap.data.len().min(bytes.len());
        bitmap.data[..n].copy_from_slice(&bytes[..n]);

        // Clear any bits past the last pixel so equality is well defined
        let bits = bitmap.len_bits();
        let spare = bitmap.data.len() * 8 - bits;
        if spare > 0 {
            if let Some(last) = bitmap.data.last_mut() {
                *last &= 0xFFu8 << spare;
            }
        }
        bitmap
    }

    /// Build a bitmap from a row-major bit sequence
    pub fn from_bits<I>(width: u32, height: u32, bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bitmap = Self::new(width, height);
        for (i, bit) in bits.into_iter().take(bitmap.len_bits()).enumerate() {
            if bit {
                bitmap.data[i / 8] |= 0x80u8 >> (i % 8);
            }
        }
        bitmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`)
    pub fn len_bits(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Packed pixel data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the bit at row-major index `i`
    pub fn bit(&self, i: usize) -> bool {
        if i >= self.len_bits() {
            return false;
        }
        self.data[i / 8] & (0x80u8 >> (i % 8)) != 0
    }

    /// Get the pixel at `(x, y)`; out-of-range coordinates read as unlit
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bit(y as usize * self.width as usize + x as usize)
    }

    /// Set the pixel at `(x, y)`; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, lit: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y as usize * self.width as usize + x as usize;
        let mask = 0x80u8 >> (i % 8);
        if lit {
            self.data[i / 8] |= mask;
        } else {
            self.data[i / 8] &= !mask;
        }
    }

    /// Iterate over all pixel bits in row-major order
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len_bits()).map(move |i| self.bit(i))
    }

    /// Iterate over the coordinates of lit pixels
    pub fn lit_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1) as usize;
        (0..self.len_bits())
            .filter(move |&i| self.bit(i))
            .map(move |i| ((i % width) as u32, (i / width) as u32))
    }

    /// Number of lit pixels
    pub fn count_lit(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Nearest-neighbour resample to a new size
    ///
    /// Each destination pixel copies the source pixel at
    /// `(x * src_w / dst_w, y * src_h / dst_h)`, so the result stays binary.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                if self.pixel(sx, sy) {
                    out.set_pixel(x, y, true);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unlit() {
        let bitmap = Bitmap::new(10, 3);
        assert_eq!(bitmap.len_bits(), 30);
        assert_eq!(bitmap.as_bytes().len(), 4);
        assert_eq!(bitmap.count_lit(), 0);
    }

    #[test]
    fn test_msb_first_row_major() {
        // 0x80 lights the first pixel, 0x01 the eighth
        let bitmap = Bitmap::from_packed(4, 4, &[0x81, 0x40]);
        assert!(bitmap.pixel(0, 0));
        assert!(bitmap.pixel(3, 1));
        assert!(bitmap.pixel(1, 2));
        assert!(!bitmap.pixel(1, 0));
        assert_eq!(bitmap.count_lit(), 3);
    }

    #[test]
    fn test_from_packed_masks_spare_bits() {
        let bitmap = Bitmap::from_packed(3, 3, &[0xFF, 0xFF]);
        assert_eq!(bitmap.count_lit(), 9);
        assert_eq!(bitmap.as_bytes(), &[0xFF, 0x80]);
    }

    #[test]
    fn test_set_pixel_out_of_range_is_ignored() {
        let mut bitmap = Bitmap::new(8, 8);
        bitmap.set_pixel(8, 0, true);
        bitmap.set_pixel(0, 8, true);
        assert_eq!(bitmap.count_lit(), 0);
        assert!(!bitmap.pixel(100, 100));
    }

    #[test]
    fn test_lit_pixels() {
        let mut bitmap = Bitmap::new(5, 5);
        bitmap.set_pixel(4, 0, true);
        bitmap.set_pixel(2, 3, true);
        let lit: Vec<_> = bitmap.lit_pixels().collect();
        assert_eq!(lit, vec![(4, 0), (2, 3)]);
    }

    #[test]
    fn test_resized_downscale_stays_binary() {
        // Checkerboard of 2x2 blocks collapses to a 1px checkerboard
        let mut bitmap = Bitmap::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                bitmap.set_pixel(x, y, ((x / 2) + (y / 2)) % 2 == 0);
            }
        }
        let small = bitmap.resized(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(small.pixel(x, y), (x + y) % 2 == 0);
            }
        }
    }

    #[test]
    fn test_resized_upscale() {
        let bitmap = Bitmap::from_bits(2, 1, [true, false]);
        let big = bitmap.resized(4, 2);
        let bits: Vec<_> = big.bits().collect();
        assert_eq!(bits, vec![true, true, false, false, true, true, false, false]);
    }
}
