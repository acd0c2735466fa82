//! Color quantization strategies.
//!
//! The [`Quantizer`] trait is the seam between
//! [`palette_img`](super::palette::palette_img) (which decides *what* to
//! quantize) and the algorithm that picks the palette. Every strategy
//! returns a [`PalettedImage`] with at most `max_colors` entries and no
//! dithering: each pixel indexes exactly one palette color.
//!
//! | Method | Strategy | Notes |
//! |---|---|---|
//! | [`QuantizeMethod::MaxCoverage`] | [`MaxCoverage`] | `exoquant` divisive clustering refined with k-means |
//! | [`QuantizeMethod::FastOctree`] | [`FastSplit`] | `exoquant` divisive clustering only, good when the true color count is already small |
//! | [`QuantizeMethod::LibImageQuant`] | [`LibImageQuant`] | `imagequant` crate |
//!
//! Images that already fit the budget skip the algorithm and keep their
//! exact colors.

mod libimagequant;
mod split;

pub use libimagequant::LibImageQuant;
pub use split::{FastSplit, MaxCoverage};

use super::error::{ImagingError, Result, invalid};
use super::palette::PalettedImage;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A palette-selection algorithm.
pub trait Quantizer {
    /// Reduce `image` to at most `max_colors` colors.
    ///
    /// Callers guarantee `image` is non-empty and `1 <= max_colors <= 256`.
    fn quantize(&self, image: &RgbImage, max_colors: usize) -> Result<PalettedImage>;
}

/// Caller-selectable quantization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantizeMethod {
    #[default]
    MaxCoverage,
    FastOctree,
    #[serde(rename = "libimagequant")]
    LibImageQuant,
}

impl QuantizeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaxCoverage => "max-coverage",
            Self::FastOctree => "fast-octree",
            Self::LibImageQuant => "libimagequant",
        }
    }
}

impl Quantizer for QuantizeMethod {
    fn quantize(&self, image: &RgbImage, max_colors: usize) -> Result<PalettedImage> {
        match self {
            Self::MaxCoverage => MaxCoverage.quantize(image, max_colors),
            Self::FastOctree => FastSplit.quantize(image, max_colors),
            Self::LibImageQuant => LibImageQuant::default().quantize(image, max_colors),
        }
    }
}

impl FromStr for QuantizeMethod {
    type Err = ImagingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "max-coverage" | "maxcoverage" => Ok(Self::MaxCoverage),
            "fast-octree" | "fastoctree" | "octree" => Ok(Self::FastOctree),
            "libimagequant" | "imagequant" => Ok(Self::LibImageQuant),
            _ => Err(invalid(format!(
                "unknown quantize method '{s}' (expected max-coverage, fast-octree or libimagequant)"
            ))),
        }
    }
}

impl fmt::Display for QuantizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct colors of `image` with their pixel counts, sorted by color.
pub(crate) fn histogram(image: &RgbImage) -> Vec<([u8; 3], u64)> {
    let mut counts: HashMap<[u8; 3], u64> = HashMap::new();
    for p in image.pixels() {
        *counts.entry(p.0).or_insert(0) += 1;
    }
    let mut entries: Vec<_> = counts.into_iter().collect();
    entries.sort_unstable_by_key(|&(color, _)| color);
    entries
}

/// The image's own colors as the palette, when there are no more than
/// `max_colors` of them.
pub(crate) fn exact_palette(image: &RgbImage, max_colors: usize) -> Option<Result<PalettedImage>> {
    let colors = histogram(image);
    if colors.is_empty() || colors.len() > max_colors {
        return None;
    }
    let palette = colors.into_iter().map(|(color, _)| Rgb(color)).collect();
    Some(remap_nearest(image, palette))
}

/// Build a [`PalettedImage`] from a quantizer's raw output, dropping
/// palette entries no pixel uses and renumbering the rest in order.
pub(crate) fn compact(
    width: u32,
    height: u32,
    palette: Vec<Rgb<u8>>,
    indices: Vec<u8>,
) -> Result<PalettedImage> {
    let mut used = vec![false; palette.len()];
    for &i in &indices {
        match used.get_mut(usize::from(i)) {
            Some(slot) => *slot = true,
            None => {
                return Err(ImagingError::Quantize(format!(
                    "index {i} out of range for {}-color palette",
                    palette.len()
                )));
            }
        }
    }
    let mut renumber = vec![0u8; palette.len()];
    let mut kept = Vec::new();
    for (old, color) in palette.into_iter().enumerate() {
        if used[old] {
            renumber[old] = kept.len() as u8;
            kept.push(color);
        }
    }
    let indices = indices.into_iter().map(|i| renumber[usize::from(i)]).collect();
    PalettedImage::new(width, height, kept, indices)
}

/// Map each pixel to its nearest palette entry (squared RGB distance,
/// lowest index wins ties).
pub(crate) fn remap_nearest(image: &RgbImage, palette: Vec<Rgb<u8>>) -> Result<PalettedImage> {
    if palette.is_empty() {
        return Err(ImagingError::Quantize("empty palette".into()));
    }
    let mut cache: HashMap<[u8; 3], u8> = HashMap::new();
    let indices = image
        .pixels()
        .map(|p| *cache.entry(p.0).or_insert_with(|| nearest_index(&palette, p.0)))
        .collect();
    PalettedImage::new(image.width(), image.height(), palette, indices)
}

fn nearest_index(palette: &[Rgb<u8>], color: [u8; 3]) -> u8 {
    let distance = |entry: &Rgb<u8>| -> u32 {
        entry
            .0
            .iter()
            .zip(color)
            .map(|(&a, b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum()
    };
    let mut best = (0usize, u32::MAX);
    for (i, entry) in palette.iter().enumerate() {
        let d = distance(entry);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0 as u8
}
