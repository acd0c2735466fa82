//! Shared test fixtures for the proper-pixel-art test suite.
//!
//! Small deterministic images built in memory, so tests never depend on
//! files on disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let cell = rgb_block(&[&[RED, RED], &[GREEN, BLUE]]);
//! assert_eq!(get_cell_color(&cell).unwrap(), RED);
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};

pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

// =========================================================================
// Fixture builders
// =========================================================================

/// Build an RGB image from rows of pixels. All rows must be the same length.
pub fn rgb_block(rows: &[&[Rgb<u8>]]) -> RgbImage {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    assert!(
        rows.iter().all(|r| r.len() as u32 == width),
        "ragged rows in rgb_block"
    );
    RgbImage::from_fn(width, height, |x, y| rows[y as usize][x as usize])
}

/// Pseudo-random RGB noise from a fixed seed (xorshift), so tests are
/// repeatable without pulling in a RNG crate.
pub fn noise_rgb(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    RgbImage::from_fn(width, height, |_, _| {
        let v = next();
        Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    })
}

/// RGBA image whose alpha ramps from 0 to 255 in row-major order.
pub fn gradient_alpha_rgba(width: u32, height: u32) -> RgbaImage {
    let last = (width * height).saturating_sub(1).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let i = y * width + x;
        Rgba([
            (x * 30) as u8,
            (y * 60) as u8,
            100,
            (i * 255 / last) as u8,
        ])
    })
}

/// Opaque white canvas with a solid red sprite two pixels in from every
/// edge.
pub fn framed_sprite(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= 2 && y >= 2 && x + 2 < width && y + 2 < height;
        if inside {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}
