//! Hex-text icon encoder
//!
//! Writes the format read by [`decode`](super::decode): a `// WxHpx`
//! header followed by MSB-first bytes, sixteen tokens per line.

use alloc::string::String;
use core::fmt::Write;

use super::bitmap::Bitmap;

/// Tokens per output line
const TOKENS_PER_LINE: usize = 16;

/// Encode a bitmap as hex text
pub fn encode_hex(bitmap: &Bitmap) -> String {
    let bytes = bitmap.as_bytes();
    let mut out = String::with_capacity(16 + bytes.len() * 6);

    let _ = writeln!(out, "// {}x{}px", bitmap.width(), bitmap.height());
    for line in bytes.chunks(TOKENS_PER_LINE) {
        for (i, byte) in line.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "0x{:02x},", byte);
        }
        out.push('\n');
    }

    out
}
