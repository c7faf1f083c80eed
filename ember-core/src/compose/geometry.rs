//! Layout math for placing items on the display
//!
//! Offsets use truncating integer division (toward zero), so an item larger
//! than its container gets a negative offset rounded toward the origin.

use embedded_graphics::prelude::{Point, Size};

/// Top-left offset that centres an item in a container
pub fn center(container_w: u32, container_h: u32, item_w: u32, item_h: u32) -> Point {
    let x = (container_w as i64 - item_w as i64) / 2;
    let y = (container_h as i64 - item_h as i64) / 2;
    Point::new(x as i32, y as i32)
}

/// Size of an item scaled down to fit within bounds, preserving aspect ratio
///
/// Items that already fit are returned unchanged. Otherwise the limiting
/// axis is set to its bound and the other axis is scaled by the same
/// factor, rounded down but never below one pixel.
pub fn scale_to_fit(item_w: u32, item_h: u32, max_w: u32, max_h: u32) -> Size {
    if item_w <= max_w && item_h <= max_h {
        return Size::new(item_w, item_h);
    }
    if item_w == 0 || item_h == 0 {
        return Size::new(item_w.min(max_w), item_h.min(max_h));
    }

    // Compare max_w / item_w against max_h / item_h without division
    let width_limited = (max_w as u64) * (item_h as u64) <= (max_h as u64) * (item_w as u64);

    if width_limited {
        let h = (item_h as u64 * max_w as u64 / item_w as u64) as u32;
        Size::new(max_w, h.max(1).min(max_h.max(1)))
    } else {
        let w = (item_w as u64 * max_h as u64 / item_h as u64) as u32;
        Size::new(w.max(1).min(max_w.max(1)), max_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        assert_eq!(center(128, 64, 32, 32), Point::new(48, 16));
        assert_eq!(center(128, 64, 128, 64), Point::new(0, 0));
        assert_eq!(center(128, 64, 16, 16), Point::new(56, 24));
    }

    #[test]
    fn test_center_odd_remainder_truncates() {
        assert_eq!(center(128, 64, 17, 15), Point::new(55, 24));
        // Oversized item: -5 / 2 truncates to -2
        assert_eq!(center(10, 10, 15, 10), Point::new(-2, 0));
    }

    #[test]
    fn test_scale_to_fit_unchanged() {
        assert_eq!(scale_to_fit(64, 64, 128, 64), Size::new(64, 64));
        assert_eq!(scale_to_fit(128, 64, 128, 64), Size::new(128, 64));
    }

    #[test]
    fn test_scale_to_fit_width_limited() {
        assert_eq!(scale_to_fit(256, 64, 128, 64), Size::new(128, 32));
        assert_eq!(scale_to_fit(200, 50, 128, 64), Size::new(128, 32));
    }

    #[test]
    fn test_scale_to_fit_height_limited() {
        assert_eq!(scale_to_fit(128, 128, 128, 64), Size::new(64, 64));
        assert_eq!(scale_to_fit(64, 96, 128, 64), Size::new(42, 64));
    }

    #[test]
    fn test_scale_to_fit_preserves_minimum_pixel() {
        assert_eq!(scale_to_fit(1000, 1, 100, 100), Size::new(100, 1));
    }
}
