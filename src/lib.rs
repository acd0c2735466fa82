//! # Proper Pixel Art
//!
//! Utilities for cleaning up AI-generated "pixel art": images that look like
//! pixel art but carry soft alpha, noisy backgrounds, and far too many
//! near-identical colors.
//!
//! # Architecture: Independent Steps
//!
//! Each operation is a pure function from an image to a new image (or a
//! color). Inputs are never mutated, and every step can be run on its own:
//!
//! ```text
//! crop_border  →  clamp_alpha  →  palette_img  →  get_cell_color per cell
//!                                      │
//!                         make_background_transparent / scale_img
//! ```
//!
//! The steps run in this order when turning a high-resolution render into
//! a true-resolution sprite: strip the frame, flatten the alpha, pick a
//! small palette, then take the dominant color of every grid cell.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Image operations: alpha flattening, transparency, palette reduction, cell colors, grid overlay, scaling |
//! | [`config`] | `pixel-art.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting for every subcommand |
//!
//! # Design Decisions
//!
//! ## Binary Alpha
//!
//! Pixel art has no partial transparency. [`imaging::clamp_alpha`] keeps a
//! pixel only when its alpha reaches the threshold and replaces everything
//! else with a flat background color. There is no blending, so soft
//! anti-aliased edges cannot leak in-between colors into the palette.
//!
//! ## No Dithering
//!
//! Every quantizer maps each pixel to a single palette entry without error
//! diffusion. Dithering would scatter noise across flat regions and break
//! the per-cell majority vote done by [`imaging::get_cell_color`].
//!
//! ## Pluggable Quantizers
//!
//! Palette selection sits behind the [`imaging::Quantizer`] trait.
//! [`imaging::QuantizeMethod`] selects one of the built-in strategies, all
//! backed by quantization crates (`exoquant` split with or without k-means
//! refinement, or `imagequant`), and tests can substitute a recording mock.
//!
//! ## Config Layering
//!
//! Values resolve in three layers: stock defaults, then `pixel-art.toml`,
//! then command-line flags. The merge logic lives in [`config::merge_toml`].

pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
