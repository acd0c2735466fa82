//! Image operations, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Flatten alpha** | `DynamicImage::to_rgba8` + binary threshold mask |
//! | **Background transparency** | corner flood fill ([`flood`]) |
//! | **Crop border** | `DynamicImage::crop_imm` |
//! | **Quantize** | [`quantize`] strategies (`exoquant`, `imagequant`) |
//! | **Cell color** | frequency count over a pixel block |
//! | **Grid overlay** | `imageproc::drawing::draw_filled_rect_mut` |
//! | **Scale** | `DynamicImage::resize_exact` with `FilterType::Nearest` |
//!
//! The module is split into:
//! - **Parameters**: [`AlphaThreshold`], [`ColorMode`], [`GridStyle`]
//! - **Alpha**: flattening, corner transparency, border cropping
//! - **Palette**: [`PalettedImage`], palette reduction, per-cell color
//! - **Quantize**: the [`Quantizer`] trait and its strategies
//! - **Grid**: debug overlays and nearest-neighbor scaling

pub mod alpha;
mod color;
mod error;
pub mod flood;
pub mod grid;
pub mod palette;
mod params;
pub mod quantize;

pub use alpha::{clamp_alpha, clamp_alpha_rgb, crop_border, make_background_transparent};
pub use color::{parse_hex_color, to_hex};
pub use error::{ImagingError, Result};
pub use grid::{overlay_grid_lines, scale_img};
pub use palette::{
    PalettedImage, apply_palette, cell_color, get_cell_color, palette_img, palette_img_with,
};
pub use params::{AlphaThreshold, ColorMode, GridStyle};
pub use quantize::{QuantizeMethod, Quantizer};
