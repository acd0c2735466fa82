//! Conversion settings.
//!
//! Handles loading, validating, and merging `pixel-art.toml`. Stock
//! defaults are overridden by the file in the config directory, and CLI
//! flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [alpha]
//! threshold = 128           # Minimum alpha (0-255) to count as foreground
//! background = "#000000"    # Color for pixels below the threshold
//! mode = "rgb"              # "rgb" or "l" (greyscale)
//!
//! [palette]
//! num_colors = 16           # Upper bound on palette size (1-256)
//! method = "max-coverage"   # "max-coverage", "fast-octree" or "libimagequant"
//!
//! [grid]
//! color = "#ff0000"         # Debug grid line color
//! width = 1                 # Debug grid line width in pixels
//!
//! [output]
//! scale = 1.0               # Default factor for `scale`
//! crop_border = 0           # Default border for `crop`
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    AlphaThreshold, ColorMode, GridStyle, QuantizeMethod, palette::MAX_PALETTE_SIZE,
    parse_hex_color,
};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "pixel-art.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings loaded from `pixel-art.toml`.
///
/// All fields have defaults; a config file only needs the values it wants
/// to change. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixelArtConfig {
    /// Alpha flattening (threshold, background, output mode).
    pub alpha: AlphaConfig,
    /// Palette reduction (color budget, strategy).
    pub palette: PaletteConfig,
    /// Debug grid overlay style.
    pub grid: GridConfig,
    /// Scale and crop defaults.
    pub output: OutputConfig,
}

impl PixelArtConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PALETTE_SIZE).contains(&self.palette.num_colors) {
            return Err(ConfigError::Validation(format!(
                "palette.num_colors must be 1-{MAX_PALETTE_SIZE}"
            )));
        }
        if self.grid.width == 0 {
            return Err(ConfigError::Validation(
                "grid.width must be at least 1".into(),
            ));
        }
        if !self.output.scale.is_finite() || self.output.scale <= 0.0 {
            return Err(ConfigError::Validation(
                "output.scale must be a positive number".into(),
            ));
        }
        parse_hex_color(&self.alpha.background)
            .map_err(|e| ConfigError::Validation(format!("alpha.background: {e}")))?;
        parse_hex_color(&self.grid.color)
            .map_err(|e| ConfigError::Validation(format!("grid.color: {e}")))?;
        Ok(())
    }
}

/// Alpha flattening settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlphaConfig {
    /// Pixels with alpha at or above this value are foreground.
    pub threshold: u8,
    /// Hex color used for background pixels.
    pub background: String,
    /// Output color space.
    pub mode: ColorMode,
}

impl AlphaConfig {
    pub fn threshold(&self) -> AlphaThreshold {
        AlphaThreshold::new(self.threshold)
    }

    /// Parsed background color. Validated configs always parse.
    pub fn background_color(&self) -> Rgb<u8> {
        parse_hex_color(&self.background).unwrap_or(Rgb([0, 0, 0]))
    }
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            threshold: AlphaThreshold::default().value(),
            background: "#000000".to_string(),
            mode: ColorMode::Rgb,
        }
    }
}

/// Palette reduction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    /// Maximum number of palette colors.
    pub num_colors: usize,
    /// Quantization strategy.
    pub method: QuantizeMethod,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            num_colors: 16,
            method: QuantizeMethod::MaxCoverage,
        }
    }
}

/// Debug grid overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Hex line color.
    pub color: String,
    /// Line width in pixels.
    pub width: u32,
}

impl GridConfig {
    /// Parsed grid style. Validated configs always parse.
    pub fn style(&self) -> GridStyle {
        let default = GridStyle::default();
        GridStyle {
            color: parse_hex_color(&self.color).unwrap_or(default.color),
            width: self.width,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            width: 1,
        }
    }
}

/// Defaults for the `scale` and `crop` commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Nearest-neighbor scale factor.
    pub scale: f64,
    /// Pixels cropped from every edge.
    pub crop_border: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            crop_border: 0,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PixelArtConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `pixel-art.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file and `Err` if the
/// file exists but is not valid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PixelArtConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PixelArtConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `pixel-art.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<PixelArtConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `pixel-art.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# proper-pixel-art configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Alpha flattening
# ---------------------------------------------------------------------------
[alpha]
# Pixels with alpha at or above this value (0-255) are kept; the rest are
# replaced by the background color. There is no partial blending.
threshold = 128

# Background color for pixels below the threshold.
background = "#000000"

# Output color space: "rgb" or "l" (greyscale).
mode = "rgb"

# ---------------------------------------------------------------------------
# Palette reduction
# ---------------------------------------------------------------------------
[palette]
# Upper bound on the number of colors (1-256).
# If colors come out wrong, try a larger value.
num_colors = 16

# Quantization strategy:
#   "max-coverage"  - exoquant split refined with k-means (default)
#   "fast-octree"   - exoquant split only; try this when the image already
#                     has few colors but max-coverage merges them
#   "libimagequant" - libimagequant
method = "max-coverage"

# ---------------------------------------------------------------------------
# Debug grid overlay
# ---------------------------------------------------------------------------
[grid]
color = "#ff0000"
width = 1

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Default factor for the `scale` command (e.g. 8.0 to preview a small
# sprite). Output size is round(width * scale) x round(height * scale).
scale = 1.0

# Default border for the `crop` command: pixels removed from every edge.
# Useful when generated images carry an opaque one-pixel frame.
crop_border = 0
"##
}
