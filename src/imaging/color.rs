//! Hex color parsing and formatting.

use super::error::{Result, invalid};
use image::{Luma, Rgb};

/// Parse `#rrggbb` or `#rgb` (leading `#` optional) into an RGB color.
pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(format!("'{s}' is not a hex color")));
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid(s));
    match hex.len() {
        6 => Ok(Rgb([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ])),
        // #abc is shorthand for #aabbcc
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Rgb([short(0)?, short(1)?, short(2)?]))
        }
        _ => Err(invalid(format!(
            "'{s}' must have the form #rrggbb or #rgb"
        ))),
    }
}

/// ITU-R 601-2 luma: `L = R * 299/1000 + G * 587/1000 + B * 114/1000`,
/// in 16-bit fixed point with rounding.
pub fn luma(color: Rgb<u8>) -> Luma<u8> {
    let [r, g, b] = color.0.map(u32::from);
    Luma([((r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16) as u8])
}

/// Format an RGB color as lowercase `#rrggbb`.
pub fn to_hex(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{r:02x}{g:02x}{b:02x}")
}
