//! Hex-text icon decoder
//!
//! Icon source format:
//! ```text
//! // flame, 16x16px
//! 0x01, 0x80, 0x03, 0xc0, ...
//! ```
//!
//! - The first `<digits>x<digits>px` (case-insensitive) on any line sets the
//!   dimensions, otherwise the caller's defaults apply
//! - Lines starting with `//` are dropped before token extraction
//! - Every `0x<hex>` token is one byte of MSB-first, row-major pixel data
//!
//! Malformed content never fails: short data is zero-padded, long data is
//! truncated, and the degradation is reported.

use alloc::vec::Vec;
use core::str::Lines;

use super::bitmap::Bitmap;

/// Default icon width when the source carries no dimension comment
pub const DEFAULT_ICON_WIDTH: u32 = 16;

/// Default icon height when the source carries no dimension comment
pub const DEFAULT_ICON_HEIGHT: u32 = 16;

/// Largest declared icon accepted (pixels); larger declarations fall back
/// to the defaults
pub const MAX_ICON_PIXELS: u64 = 1 << 20;

/// Delimiter line between icons in a multi-image source
pub const SHEET_DELIMITER: &str = "---IMAGE---";

/// What the decoder had to do to produce a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeReport {
    /// Final bitmap width
    pub width: u32,
    /// Final bitmap height
    pub height: u32,
    /// Dimensions came from a `WxHpx` comment rather than defaults
    pub declared: bool,
    /// A dimension comment was found but rejected as too large
    pub oversized: bool,
    /// `(width * height) / 8`
    pub expected_bytes: usize,
    /// Hex tokens present in the source
    pub found_bytes: usize,
}

impl DecodeReport {
    /// Data had fewer bytes than the dimensions require
    pub fn padded(&self) -> bool {
        self.found_bytes < self.expected_bytes
    }

    /// Data had more bytes than the dimensions require
    pub fn truncated(&self) -> bool {
        self.found_bytes > self.expected_bytes
    }

    /// Token count matched the dimensions exactly
    pub fn is_exact(&self) -> bool {
        self.found_bytes == self.expected_bytes
    }
}

/// Decode an icon, logging any degradation as a warning
pub fn decode(text: &str, default_width: u32, default_height: u32) -> Bitmap {
    let (bitmap, report) = decode_with_report(text, default_width, default_height);

    if report.oversized {
        warn!(
            "Icon dimension comment too large, using {}x{}",
            report.width, report.height
        );
    }
    if !report.is_exact() {
        warn!(
            "Hex data size mismatch: expected {} bytes, got {}",
            report.expected_bytes, report.found_bytes
        );
    }

    bitmap
}

/// Decode an icon and describe what was reconciled
pub fn decode_with_report(
    text: &str,
    default_width: u32,
    default_height: u32,
) -> (Bitmap, DecodeReport) {
    let mut declared = false;
    let mut oversized = false;
    let (width, height) = match parse_dimensions(text) {
        Some((w, h)) if (w as u64) * (h as u64) <= MAX_ICON_PIXELS => {
            declared = true;
            (w, h)
        }
        Some(_) => {
            oversized = true;
            (default_width, default_height)
        }
        None => (default_width, default_height),
    };

    let expected_bytes = (width as usize * height as usize) / 8;

    let mut bytes = Vec::with_capacity(expected_bytes);
    let mut found_bytes = 0;
    for token in HexTokens::new(text) {
        if bytes.len() < expected_bytes {
            // Only the low 8 bits of a token are pixel data
            bytes.push(token as u8);
        }
        found_bytes += 1;
    }
    // Missing bytes stay zero in the bitmap
    let bitmap = Bitmap::from_packed(width, height, &bytes);

    let report = DecodeReport {
        width,
        height,
        declared,
        oversized,
        expected_bytes,
        found_bytes,
    };
    (bitmap, report)
}

/// Decode every icon in a `---IMAGE---` separated source
///
/// Parts with no content are skipped. A source with no delimiter decodes
/// as a single icon.
pub fn decode_sheet(text: &str, default_width: u32, default_height: u32) -> Vec<Bitmap> {
    split_sheet(text)
        .into_iter()
        .map(|part| decode(part, default_width, default_height))
        .collect()
}

/// Split a multi-image source on delimiter lines
pub fn split_sheet(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim() == SHEET_DELIMITER {
            parts.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    parts.push(&text[start..]);

    parts.retain(|part| !part.trim().is_empty());
    parts
}

/// Find the first `<digits>x<digits>px` declaration in the source
pub fn parse_dimensions(text: &str) -> Option<(u32, u32)> {
    text.lines().find_map(line_dimensions)
}

fn line_dimensions(line: &str) -> Option<(u32, u32)> {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let (width, after_width) = digit_run(bytes, i);
        if let Some(dims) = width.and_then(|w| height_and_suffix(bytes, after_width, w)) {
            return Some(dims);
        }
        i = after_width;
    }

    None
}

/// Match `x<digits>px` at `i`
fn height_and_suffix(bytes: &[u8], i: usize, width: u32) -> Option<(u32, u32)> {
    if !matches!(bytes.get(i), Some(b'x' | b'X')) {
        return None;
    }
    if !bytes.get(i + 1)?.is_ascii_digit() {
        return None;
    }

    let (height, after_height) = digit_run(bytes, i + 1);
    let suffix = bytes.get(after_height..after_height + 2)?;
    if suffix.eq_ignore_ascii_case(b"px") {
        height.map(|h| (width, h))
    } else {
        None
    }
}

/// Parse a run of decimal digits starting at `start`
///
/// Returns the value (None on overflow) and the index after the run.
fn digit_run(bytes: &[u8], start: usize) -> (Option<u32>, usize) {
    let mut value: Option<u32> = Some(0);
    let mut end = start;
    while let Some(&b) = bytes.get(end) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value
            .and_then(|v| v.checked_mul(10))
            .and_then(|v| v.checked_add((b - b'0') as u32));
        end += 1;
    }
    (value, end)
}

/// Check whether a line is a `//` comment
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// Iterator over `0x<hex>` tokens outside comment lines
///
/// Values wider than 32 bits keep their low bits.
pub struct HexTokens<'a> {
    lines: Lines<'a>,
    current: &'a [u8],
}

impl<'a> HexTokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            current: &[],
        }
    }

    fn next_in_line(&mut self) -> Option<u32> {
        let bytes = self.current;
        let mut i = 0;

        while i + 2 < bytes.len() {
            if bytes[i] == b'0' && bytes[i + 1] == b'x' && bytes[i + 2].is_ascii_hexdigit() {
                let mut value: u32 = 0;
                let mut end = i + 2;
                while let Some(digit) = bytes.get(end).and_then(|&b| (b as char).to_digit(16)) {
                    value = (value << 4) | digit;
                    end += 1;
                }
                self.current = &bytes[end..];
                return Some(value);
            }
            i += 1;
        }

        self.current = &[];
        None
    }
}

impl Iterator for HexTokens<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(value) = self.next_in_line() {
                return Some(value);
            }

            let line = self.lines.next()?;
            if !is_comment(line) {
                self.current = line.as_bytes();
            }
        }
    }
}
