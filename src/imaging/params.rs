//! Parameter types for imaging operations.
//!
//! These describe *how* an operation should treat its input, separately from
//! the pixel work in [`alpha`](super::alpha), [`palette`](super::palette) and
//! [`grid`](super::grid).
//!
//! ## Types
//!
//! - [`AlphaThreshold`]: Minimum alpha (0–255, default 128) for a pixel to count as foreground.
//! - [`ColorMode`]: Output color space of alpha flattening: full color or greyscale.
//! - [`GridStyle`]: Stroke color and width for debug grid lines.

use super::error::{ImagingError, invalid};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum opacity for a pixel to be treated as foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaThreshold(pub u8);

impl AlphaThreshold {
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Binary mask test: no partial blending.
    pub fn is_opaque(self, alpha: u8) -> bool {
        alpha >= self.0
    }
}

impl Default for AlphaThreshold {
    fn default() -> Self {
        Self(128)
    }
}

/// Color space produced by [`clamp_alpha`](super::alpha::clamp_alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Three-channel RGB.
    #[default]
    Rgb,
    /// Single-channel greyscale.
    #[serde(alias = "luma")]
    L,
}

impl FromStr for ColorMode {
    type Err = ImagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rgb" | "RGB" => Ok(Self::Rgb),
            "l" | "L" | "luma" => Ok(Self::L),
            other => Err(invalid(format!("mode must be 'RGB' or 'L', got '{other}'"))),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => f.write_str("RGB"),
            Self::L => f.write_str("L"),
        }
    }
}

/// Stroke parameters for [`overlay_grid_lines`](super::grid::overlay_grid_lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStyle {
    pub color: Rgb<u8>,
    pub width: u32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            color: Rgb([255, 0, 0]),
            width: 1,
        }
    }
}
