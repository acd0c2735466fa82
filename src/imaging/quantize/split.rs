//! Divisive clustering through the `exoquant` crate.
//!
//! `exoquant` starts from one cluster holding every color and keeps
//! splitting the cluster with the largest error until the budget is
//! reached. [`FastSplit`] stops there; [`MaxCoverage`] then refines the
//! centroids with k-means so that heavily used colors are matched closely.
//! Both remap without dithering.

use super::{Quantizer, compact, exact_palette};
use crate::imaging::error::Result;
use crate::imaging::palette::PalettedImage;
use exoquant::optimizer::{self, Optimizer};
use exoquant::{Color, convert_to_indexed, ditherer};
use image::{Rgb, RgbImage};

/// Hierarchical split followed by k-means refinement.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxCoverage;

/// Hierarchical split only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastSplit;

impl Quantizer for MaxCoverage {
    fn quantize(&self, image: &RgbImage, max_colors: usize) -> Result<PalettedImage> {
        quantize_with(image, max_colors, &optimizer::KMeans)
    }
}

impl Quantizer for FastSplit {
    fn quantize(&self, image: &RgbImage, max_colors: usize) -> Result<PalettedImage> {
        quantize_with(image, max_colors, &optimizer::None)
    }
}

fn quantize_with(
    image: &RgbImage,
    max_colors: usize,
    refine: &impl Optimizer,
) -> Result<PalettedImage> {
    if let Some(exact) = exact_palette(image, max_colors) {
        return exact;
    }
    let (width, height) = image.dimensions();
    let pixels: Vec<Color> = image
        .pixels()
        .map(|p| Color::new(p[0], p[1], p[2], 255))
        .collect();

    let (palette, indices) = convert_to_indexed(
        &pixels,
        width as usize,
        max_colors,
        refine,
        &ditherer::None,
    );
    let palette = palette.iter().map(|c| Rgb([c.r, c.g, c.b])).collect();
    compact(width, height, palette, indices)
}
