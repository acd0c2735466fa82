//! Quantization through libimagequant (`imagequant` crate).

use super::{Quantizer, compact};
use crate::imaging::error::{ImagingError, Result};
use crate::imaging::palette::PalettedImage;
use image::{Rgb, RgbImage};

/// libimagequant with dithering disabled.
///
/// `speed` trades quality for time (1 = slowest/best, 10 = fastest).
/// libimagequant cannot produce fewer than two colors, so a budget of one
/// keeps only the most used entry of a two-color result.
#[derive(Debug, Clone, Copy)]
pub struct LibImageQuant {
    pub speed: i32,
}

impl Default for LibImageQuant {
    fn default() -> Self {
        Self { speed: 4 }
    }
}

fn liq_error(err: imagequant::Error) -> ImagingError {
    ImagingError::Quantize(format!("libimagequant: {err}"))
}

impl Quantizer for LibImageQuant {
    fn quantize(&self, image: &RgbImage, max_colors: usize) -> Result<PalettedImage> {
        let (width, height) = image.dimensions();

        let mut attr = imagequant::Attributes::new();
        attr.set_max_colors(max_colors.max(2) as u32).map_err(liq_error)?;
        attr.set_speed(self.speed).map_err(liq_error)?;

        let pixels: Vec<imagequant::RGBA> = image
            .pixels()
            .map(|p| imagequant::RGBA::new(p[0], p[1], p[2], 255))
            .collect();
        let mut liq_image = attr
            .new_image(pixels, width as usize, height as usize, 0.0)
            .map_err(liq_error)?;
        let mut result = attr.quantize(&mut liq_image).map_err(liq_error)?;
        result.set_dithering_level(0.0).map_err(liq_error)?;

        let (palette, indices) = result.remapped(&mut liq_image).map_err(liq_error)?;
        let palette = palette.iter().map(|c| Rgb([c.r, c.g, c.b])).collect();
        let paletted = compact(width, height, palette, indices)?;
        if max_colors == 1 {
            return Ok(dominant_only(&paletted));
        }
        Ok(paletted)
    }
}

/// Collapse to the palette entry covering the most pixels (lowest index on
/// ties).
fn dominant_only(paletted: &PalettedImage) -> PalettedImage {
    let counts = paletted.color_counts();
    let best = (0..counts.len())
        .max_by(|&a, &b| counts[a].cmp(&counts[b]).then(b.cmp(&a)))
        .unwrap_or(0);
    let (width, height) = paletted.dimensions();
    PalettedImage::filled(width, height, paletted.palette()[best])
}
