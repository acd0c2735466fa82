//! Palette reduction and per-cell color selection.
//!
//! [`palette_img`] flattens alpha and reduces an image to at most K colors
//! with a pluggable [`Quantizer`]. [`get_cell_color`] picks the single
//! color a pixel-art cell should become: the most frequent color in the
//! block, never an average, so the result is always a color the artist
//! actually used.

use super::alpha::clamp_alpha_rgb;
use super::error::{ImagingError, Result, invalid};
use super::quantize::{QuantizeMethod, Quantizer, remap_nearest};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

/// Largest palette an indexed image can hold.
pub const MAX_PALETTE_SIZE: usize = 256;

/// An image stored as a palette plus one palette index per pixel
/// (row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettedImage {
    width: u32,
    height: u32,
    palette: Vec<Rgb<u8>>,
    indices: Vec<u8>,
}

impl PalettedImage {
    /// Validates that there is one index per pixel and every index points
    /// into the palette.
    pub fn new(width: u32, height: u32, palette: Vec<Rgb<u8>>, indices: Vec<u8>) -> Result<Self> {
        if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
            return Err(ImagingError::Quantize(format!(
                "palette must have 1-{MAX_PALETTE_SIZE} entries, got {}",
                palette.len()
            )));
        }
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(ImagingError::Quantize(format!(
                "expected {expected} indices for {width}x{height}, got {}",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| usize::from(i) >= palette.len()) {
            return Err(ImagingError::Quantize(format!(
                "index {bad} out of range for {}-color palette",
                palette.len()
            )));
        }
        Ok(Self {
            width,
            height,
            palette,
            indices,
        })
    }

    /// A single-color image.
    pub fn filled(width: u32, height: u32, color: Rgb<u8>) -> Self {
        Self {
            width,
            height,
            palette: vec![color],
            indices: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn palette(&self) -> &[Rgb<u8>] {
        &self.palette
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Number of palette entries (always ≤ the requested maximum).
    pub fn num_colors(&self) -> usize {
        self.palette.len()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        let i = y as usize * self.width as usize + x as usize;
        self.palette[usize::from(self.indices[i])]
    }

    /// Pixels per palette entry, in palette order.
    pub fn color_counts(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.palette.len()];
        for &i in &self.indices {
            counts[usize::from(i)] += 1;
        }
        counts
    }

    /// Expand back to a plain RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| self.get_pixel(x, y))
    }

    /// Encode as an 8-bit indexed PNG, keeping the palette in a PLTE chunk.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        let plte: Vec<u8> = self.palette.iter().flat_map(|c| c.0).collect();
        encoder.set_palette(plte);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.indices)?;
        writer.finish()?;
        Ok(())
    }

    /// [`write_png`](Self::write_png) to a file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_png(BufWriter::new(file))
    }
}

fn check_palette_request(image: &DynamicImage, num_colors: usize) -> Result<()> {
    if !(1..=MAX_PALETTE_SIZE).contains(&num_colors) {
        return Err(invalid(format!(
            "num_colors must be 1-{MAX_PALETTE_SIZE}, got {num_colors}"
        )));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(invalid("cannot quantize an empty image"));
    }
    Ok(())
}

/// Reduce `image` to at most `num_colors` colors with `method`.
///
/// Alpha is flattened first (threshold 128, black background), so
/// transparent areas become one flat background color instead of noise.
/// No dithering is applied.
pub fn palette_img(
    image: &DynamicImage,
    num_colors: usize,
    method: QuantizeMethod,
) -> Result<PalettedImage> {
    palette_img_with(image, num_colors, &method)
}

/// [`palette_img`] with any [`Quantizer`].
pub fn palette_img_with(
    image: &DynamicImage,
    num_colors: usize,
    quantizer: &impl Quantizer,
) -> Result<PalettedImage> {
    check_palette_request(image, num_colors)?;
    let rgb = clamp_alpha_rgb(image);
    let paletted = quantizer.quantize(&rgb, num_colors)?;
    if paletted.num_colors() > num_colors {
        return Err(ImagingError::Quantize(format!(
            "quantizer returned {} colors, limit was {num_colors}",
            paletted.num_colors()
        )));
    }
    Ok(paletted)
}

/// Remap `image` onto the palette of an already quantized image.
///
/// Useful for carrying a palette chosen at full resolution over to a
/// downscaled version. Alpha is flattened the same way as in
/// [`palette_img`].
pub fn apply_palette(image: &DynamicImage, palette: &PalettedImage) -> Result<PalettedImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(invalid("cannot remap an empty image"));
    }
    remap_nearest(&clamp_alpha_rgb(image), palette.palette().to_vec())
}

/// The most frequent color in a block of pixels.
///
/// Ties go to the color encountered first in row-major order. An empty
/// block is an error.
pub fn get_cell_color<I>(cell: &I) -> Result<Rgb<u8>>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    most_frequent(cell.pixels().map(|(_, _, pixel)| pixel))
}

/// [`get_cell_color`] over the block `columns × rows` of `image`.
pub fn cell_color(image: &RgbImage, columns: Range<u32>, rows: Range<u32>) -> Result<Rgb<u8>> {
    let (width, height) = image.dimensions();
    if columns.is_empty() || rows.is_empty() {
        return Err(invalid(format!("cell {columns:?} x {rows:?} is empty")));
    }
    if columns.end > width || rows.end > height {
        return Err(invalid(format!(
            "cell {columns:?} x {rows:?} is outside the {width}x{height} image"
        )));
    }
    most_frequent(rows.flat_map(|y| columns.clone().map(move |x| *image.get_pixel(x, y))))
}

fn most_frequent(pixels: impl Iterator<Item = Rgb<u8>>) -> Result<Rgb<u8>> {
    // color -> (count, first position)
    let mut counts: HashMap<[u8; 3], (u32, usize)> = HashMap::new();
    for (position, pixel) in pixels.enumerate() {
        counts.entry(pixel.0).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(color, _)| Rgb(color))
        .ok_or_else(|| invalid("cell is empty"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::quantize::tests::MockQuantizer;
    use crate::test_helpers::*;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;

    // =========================================================================
    // PalettedImage
    // =========================================================================

    #[test]
    fn paletted_image_rejects_wrong_index_count() {
        let result = PalettedImage::new(2, 2, vec![RED], vec![0; 3]);
        assert!(matches!(result, Err(ImagingError::Quantize(_))));
    }

    #[test]
    fn paletted_image_rejects_out_of_range_index() {
        assert!(PalettedImage::new(1, 2, vec![RED, BLUE], vec![0, 2]).is_err());
    }

    #[test]
    fn paletted_image_rejects_empty_palette() {
        assert!(PalettedImage::new(0, 0, Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn paletted_image_expands_and_counts() {
        let p = PalettedImage::new(3, 1, vec![RED, BLUE], vec![1, 0, 1]).unwrap();
        assert_eq!(p.get_pixel(0, 0), BLUE);
        assert_eq!(p.color_counts(), vec![1, 2]);
        assert_eq!(p.to_rgb_image(), rgb_block(&[&[BLUE, RED, BLUE]]));
    }

    #[test]
    fn filled_image_has_one_entry() {
        let p = PalettedImage::filled(3, 2, GREEN);
        assert_eq!(p.color_counts(), vec![6]);
        assert_eq!(p.to_rgb_image(), RgbImage::from_pixel(3, 2, GREEN));
    }

    #[test]
    fn save_png_writes_indexed_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("indexed.png");
        let p = PalettedImage::new(2, 2, vec![RED, BLUE], vec![0, 1, 1, 0]).unwrap();
        p.save_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // IHDR color type byte: 3 = indexed.
        assert_eq!(bytes[25], 3);
        let plte = bytes.windows(4).position(|w| w == b"PLTE").unwrap();
        assert_eq!(&bytes[plte + 4..plte + 10], &[255, 0, 0, 0, 0, 255]);

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, p.to_rgb_image());
    }

    // =========================================================================
    // palette_img
    // =========================================================================

    #[test]
    fn palette_img_single_color_on_any_image() {
        let img = DynamicImage::ImageRgb8(noise_rgb(10, 6, 1));
        for method in [
            QuantizeMethod::MaxCoverage,
            QuantizeMethod::FastOctree,
            QuantizeMethod::LibImageQuant,
        ] {
            let out = palette_img(&img, 1, method).unwrap();
            assert_eq!(out.num_colors(), 1, "{method}");
            let distinct: HashSet<_> = out.to_rgb_image().pixels().copied().collect();
            assert_eq!(distinct.len(), 1, "{method}");
        }
    }

    #[test]
    fn palette_img_bounds_palette_size() {
        let img = DynamicImage::ImageRgb8(noise_rgb(20, 20, 2));
        for k in [2, 4, 16] {
            let out = palette_img(&img, k, QuantizeMethod::default()).unwrap();
            assert!(out.num_colors() <= k);
            let distinct: HashSet<_> = out.to_rgb_image().pixels().copied().collect();
            assert!(distinct.len() <= k);
        }
    }

    #[test]
    fn palette_img_rejects_bad_color_counts() {
        let img = DynamicImage::ImageRgb8(noise_rgb(4, 4, 3));
        assert!(matches!(
            palette_img(&img, 0, QuantizeMethod::default()),
            Err(ImagingError::InvalidArgument(_))
        ));
        assert!(palette_img(&img, 257, QuantizeMethod::default()).is_err());
    }

    #[test]
    fn palette_img_rejects_empty_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 3));
        assert!(palette_img(&img, 4, QuantizeMethod::default()).is_err());
    }

    #[test]
    fn palette_img_flattens_alpha_before_quantizing() {
        let src = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([200, 10, 10, 255])
            } else {
                Rgba([10, 200, 10, 0])
            }
        });
        let mock = MockQuantizer::default();
        palette_img_with(&DynamicImage::ImageRgba8(src), 5, &mock).unwrap();

        let calls = mock.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (seen, max_colors) = &calls[0];
        assert_eq!(*max_colors, 5);
        assert_eq!(*seen.get_pixel(0, 0), Rgb([200, 10, 10]));
        assert_eq!(*seen.get_pixel(1, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn palette_img_validates_before_calling_quantizer() {
        let mock = MockQuantizer::default();
        let img = DynamicImage::ImageRgb8(noise_rgb(2, 2, 4));
        assert!(palette_img_with(&img, 0, &mock).is_err());
        assert!(mock.calls.borrow().is_empty());
    }

    #[test]
    fn apply_palette_reuses_existing_palette() {
        let source = DynamicImage::ImageRgb8(rgb_block(&[&[RED, BLUE]]));
        let paletted = palette_img(&source, 2, QuantizeMethod::default()).unwrap();

        let other = DynamicImage::ImageRgb8(rgb_block(&[&[Rgb([240, 20, 0]), Rgb([0, 0, 200])]]));
        let remapped = apply_palette(&other, &paletted).unwrap();
        assert_eq!(remapped.palette(), paletted.palette());
        assert_eq!(remapped.to_rgb_image(), rgb_block(&[&[RED, BLUE]]));
    }

    // =========================================================================
    // get_cell_color
    // =========================================================================

    #[test]
    fn uniform_cell_returns_its_color() {
        let cell = rgb_block(&[&[RED, RED], &[RED, RED]]);
        assert_eq!(get_cell_color(&cell).unwrap(), RED);
    }

    #[test]
    fn majority_color_wins() {
        let cell = rgb_block(&[&[RED, RED], &[GREEN, BLUE]]);
        assert_eq!(get_cell_color(&cell).unwrap(), RED);
    }

    #[test]
    fn ties_go_to_first_color_in_scan_order() {
        let cell = rgb_block(&[&[GREEN, RED], &[RED, GREEN]]);
        assert_eq!(get_cell_color(&cell).unwrap(), GREEN);

        let cell = rgb_block(&[&[BLUE, RED, GREEN]]);
        assert_eq!(get_cell_color(&cell).unwrap(), BLUE);
    }

    #[test]
    fn tie_break_ignores_which_color_reaches_the_count_first() {
        // RED appears first but GREEN reaches count 2 earlier.
        let cell = rgb_block(&[&[RED, GREEN, GREEN, RED]]);
        assert_eq!(get_cell_color(&cell).unwrap(), RED);
    }

    #[test]
    fn cell_color_is_a_mode() {
        let img = noise_rgb(7, 5, 8);
        let chosen = get_cell_color(&img).unwrap();
        let mut counts: HashMap<Rgb<u8>, usize> = HashMap::new();
        for p in img.pixels() {
            *counts.entry(*p).or_default() += 1;
        }
        let best = counts.values().copied().max().unwrap();
        assert_eq!(counts[&chosen], best);
    }

    #[test]
    fn empty_cell_is_an_error() {
        let cell = RgbImage::new(0, 0);
        assert!(matches!(
            get_cell_color(&cell),
            Err(ImagingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn cell_color_reads_the_requested_block() {
        // Left half red, right half blue.
        let img = RgbImage::from_fn(8, 4, |x, _| if x < 4 { RED } else { BLUE });
        assert_eq!(cell_color(&img, 0..4, 0..4).unwrap(), RED);
        assert_eq!(cell_color(&img, 4..8, 1..3).unwrap(), BLUE);
        assert_eq!(cell_color(&img, 3..6, 0..1).unwrap(), BLUE);
    }

    #[test]
    fn cell_color_rejects_bad_ranges() {
        let img = RgbImage::new(4, 4);
        assert!(cell_color(&img, 2..2, 0..4).is_err());
        assert!(cell_color(&img, 0..5, 0..4).is_err());
        assert!(cell_color(&img, 0..4, 3..9).is_err());
    }
}
