//! Debug grid overlay and nearest-neighbor scaling.

use super::error::{Result, invalid};
use super::params::GridStyle;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Draw vertical lines at each x in `lines_x` and horizontal lines at each
/// y in `lines_y` over an RGBA copy of `image`.
///
/// A line of width `w` at position `p` covers `[p - w/2, p - w/2 + w)`;
/// anything outside the canvas is clipped.
pub fn overlay_grid_lines(
    image: &DynamicImage,
    lines_x: &[u32],
    lines_y: &[u32],
    style: GridStyle,
) -> Result<RgbaImage> {
    if style.width == 0 {
        return Err(invalid("grid line width must be at least 1"));
    }
    let mut canvas = image.to_rgba8();
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Ok(canvas);
    }

    let [r, g, b] = style.color.0;
    let color = Rgba([r, g, b, 255]);
    let offset = style.width / 2;

    for &x in lines_x.iter().filter(|&&x| x < width.saturating_add(offset)) {
        let left = x as i32 - offset as i32;
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(left, 0).of_size(style.width, height),
            color,
        );
    }
    for &y in lines_y.iter().filter(|&&y| y < height.saturating_add(offset)) {
        let top = y as i32 - offset as i32;
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(0, top).of_size(width, style.width),
            color,
        );
    }
    Ok(canvas)
}

/// Resize by `scale` with nearest-neighbor sampling to
/// `round(width * scale) x round(height * scale)`.
///
/// Never interpolates, so hard pixel edges survive and no new colors
/// appear.
pub fn scale_img(image: &DynamicImage, scale: f64) -> Result<DynamicImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(invalid(format!("scale must be a positive number, got {scale}")));
    }
    let target = |len: u32| (f64::from(len) * scale).round();
    let (new_width, new_height) = (target(image.width()), target(image.height()));
    if new_width < 1.0 || new_height < 1.0 {
        return Err(invalid(format!(
            "scaling {}x{} by {scale} leaves no pixels",
            image.width(),
            image.height()
        )));
    }
    if new_width > f64::from(u32::MAX) || new_height > f64::from(u32::MAX) {
        return Err(invalid(format!("scale {scale} is too large")));
    }
    Ok(image.resize_exact(new_width as u32, new_height as u32, FilterType::Nearest))
}
