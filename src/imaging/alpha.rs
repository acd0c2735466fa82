//! Alpha handling: flattening onto a background, corner flood-fill
//! transparency, and border cropping.
//!
//! AI image generators and hand-exported sprites rarely have clean alpha.
//! Before palette reduction every pixel is forced to one of two states
//! (foreground or background) with a binary threshold. After conversion the
//! background can be made transparent again by flood-filling from the
//! corners.

use super::color::luma;
use super::error::{Result, invalid};
use super::flood::flood_fill;
use super::params::{AlphaThreshold, ColorMode};
use image::{DynamicImage, GrayImage, Pixel, Rgb, RgbImage, Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Flatten `image` onto a solid `background` using a binary alpha mask.
///
/// Pixels with alpha ≥ `threshold` keep their color (converted to `mode`),
/// all others become `background`. Images without an alpha channel are
/// fully opaque. Returns `ImageRgb8` or `ImageLuma8`.
pub fn clamp_alpha(
    image: &DynamicImage,
    threshold: AlphaThreshold,
    mode: ColorMode,
    background: Rgb<u8>,
) -> DynamicImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let visible = |x: u32, y: u32| {
        let p = rgba.get_pixel(x, y);
        threshold.is_opaque(p[3]).then(|| p.to_rgb())
    };

    match mode {
        ColorMode::Rgb => DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            visible(x, y).unwrap_or(background)
        })),
        ColorMode::L => {
            let background = luma(background);
            DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
                visible(x, y).map_or(background, luma)
            }))
        }
    }
}

/// [`clamp_alpha`] with the defaults used before quantization: threshold
/// 128, RGB output, black background.
pub fn clamp_alpha_rgb(image: &DynamicImage) -> RgbImage {
    clamp_alpha(
        image,
        AlphaThreshold::default(),
        ColorMode::Rgb,
        Rgb([0, 0, 0]),
    )
    .into_rgb8()
}

/// Make the background transparent by flood-filling each corner with
/// `[0, 0, 0, 0]`.
///
/// Corners are filled top-left, top-right, bottom-left, bottom-right. Only
/// pixels exactly matching the corner color and 4-connected to it are
/// cleared, so enclosed regions of the same color stay opaque.
pub fn make_background_transparent(image: &DynamicImage) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return rgba;
    }
    let (right, bottom) = (width - 1, height - 1);
    for (x, y) in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
        flood_fill(&mut rgba, x, y, TRANSPARENT);
    }
    rgba
}

/// Remove `num_pixels` from every edge.
///
/// Generated images with a "transparent" background often carry a one-pixel
/// opaque frame; cropping it lets the corner flood fill reach the real
/// background. Fails unless `2 * num_pixels` is smaller than both
/// dimensions.
pub fn crop_border(image: &DynamicImage, num_pixels: u32) -> Result<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    let both_edges = num_pixels
        .checked_mul(2)
        .ok_or_else(|| invalid(format!("border of {num_pixels}px is too large")))?;
    if both_edges >= width || both_edges >= height {
        return Err(invalid(format!(
            "cannot crop {num_pixels}px from each edge of a {width}x{height} image"
        )));
    }
    Ok(image.crop_imm(
        num_pixels,
        num_pixels,
        width - both_edges,
        height - both_edges,
    ))
}
