use clap::{Parser, Subcommand};
use image::{DynamicImage, GenericImageView, Rgb};
use proper_pixel_art::config::{self, PixelArtConfig};
use proper_pixel_art::imaging::{self, ColorMode, GridStyle, QuantizeMethod};
use proper_pixel_art::output;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Input and output image paths shared by every converting command.
#[derive(clap::Args, Clone)]
struct ImagePaths {
    /// Source image (any format the `image` crate decodes)
    input: PathBuf,
    /// Destination image; the format follows the file extension
    output: PathBuf,
}

#[derive(Parser)]
#[command(name = "proper-pixel-art")]
#[command(about = "Clean up AI-generated pixel art")]
#[command(long_about = "\
Clean up AI-generated pixel art

Each subcommand runs one step on an image file and writes the result:

  flatten      binary alpha threshold over a flat background color
  palette      reduce to a small palette (no dithering)
  transparent  make the background reachable from the corners transparent
  crop         remove a fixed border from every edge
  scale        nearest-neighbor resize
  grid         draw debug grid lines
  cell-color   print the dominant color of a block of pixels

Defaults come from pixel-art.toml in the --config directory; flags override
them. Run 'proper-pixel-art gen-config' to print a documented pixel-art.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing pixel-art.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Threshold alpha and composite onto a flat background
    Flatten {
        #[command(flatten)]
        io: ImagePaths,
        /// Minimum alpha (0-255) kept as foreground
        #[arg(long)]
        threshold: Option<u8>,
        /// Background color, e.g. "#000000"
        #[arg(long, value_parser = parse_color)]
        background: Option<Rgb<u8>>,
        /// Output mode: RGB or L
        #[arg(long)]
        mode: Option<ColorMode>,
    },
    /// Reduce the image to a limited palette
    Palette {
        #[command(flatten)]
        io: ImagePaths,
        /// Maximum number of colors (1-256)
        #[arg(long)]
        colors: Option<usize>,
        /// max-coverage, fast-octree or libimagequant
        #[arg(long)]
        method: Option<QuantizeMethod>,
    },
    /// Make the corner-connected background transparent
    Transparent {
        #[command(flatten)]
        io: ImagePaths,
    },
    /// Remove a border of fixed width from every edge
    Crop {
        #[command(flatten)]
        io: ImagePaths,
        /// Pixels removed from each edge
        #[arg(long)]
        pixels: Option<u32>,
    },
    /// Resize with nearest-neighbor sampling
    Scale {
        #[command(flatten)]
        io: ImagePaths,
        /// Scale factor, e.g. 8 or 0.5
        #[arg(long)]
        factor: Option<f64>,
    },
    /// Draw debug grid lines
    Grid {
        #[command(flatten)]
        io: ImagePaths,
        /// Comma-separated x positions of vertical lines
        #[arg(long, value_delimiter = ',')]
        lines_x: Vec<u32>,
        /// Comma-separated y positions of horizontal lines
        #[arg(long, value_delimiter = ',')]
        lines_y: Vec<u32>,
        /// Line color, e.g. "#ff0000"
        #[arg(long, value_parser = parse_color)]
        color: Option<Rgb<u8>>,
        /// Line width in pixels
        #[arg(long)]
        width: Option<u32>,
    },
    /// Print the most frequent color in a block of pixels
    CellColor {
        /// Source image
        input: PathBuf,
        /// Column range, e.g. 0..4
        #[arg(long, value_parser = parse_range)]
        x: Range<u32>,
        /// Row range, e.g. 0..4
        #[arg(long, value_parser = parse_range)]
        y: Range<u32>,
    },
    /// Print a stock pixel-art.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = match cli.command {
        Command::GenConfig => PixelArtConfig::default(),
        _ => config::load_config(&cli.config)?,
    };

    match cli.command {
        Command::Flatten {
            io,
            threshold,
            background,
            mode,
        } => {
            let image = image::open(&io.input)?;
            let threshold =
                threshold.map_or_else(|| cfg.alpha.threshold(), imaging::AlphaThreshold::new);
            let background = background.unwrap_or_else(|| cfg.alpha.background_color());
            let mode = mode.unwrap_or(cfg.alpha.mode);
            let flat = imaging::clamp_alpha(&image, threshold, mode, background);
            save(&flat, &io.output, "flatten")?;
        }
        Command::Palette { io, colors, method } => {
            let image = image::open(&io.input)?;
            let colors = colors.unwrap_or(cfg.palette.num_colors);
            let method = method.unwrap_or(cfg.palette.method);
            let paletted = imaging::palette_img(&image, colors, method)?;
            save_paletted(&paletted, &io.output)?;
            output::print_palette_output(&io.output, &paletted, method);
        }
        Command::Transparent { io } => {
            let image = image::open(&io.input)?;
            let cleared = imaging::make_background_transparent(&image);
            save(&DynamicImage::ImageRgba8(cleared), &io.output, "transparent")?;
        }
        Command::Crop { io, pixels } => {
            let image = image::open(&io.input)?;
            let pixels = pixels.unwrap_or(cfg.output.crop_border);
            let cropped = imaging::crop_border(&image, pixels)?;
            save(&cropped, &io.output, "crop")?;
        }
        Command::Scale { io, factor } => {
            let image = image::open(&io.input)?;
            let factor = factor.unwrap_or(cfg.output.scale);
            let scaled = imaging::scale_img(&image, factor)?;
            save(&scaled, &io.output, "scale")?;
        }
        Command::Grid {
            io,
            lines_x,
            lines_y,
            color,
            width,
        } => {
            let image = image::open(&io.input)?;
            let style = grid_style(&cfg, color, width);
            let overlay = imaging::overlay_grid_lines(&image, &lines_x, &lines_y, style)?;
            save(&DynamicImage::ImageRgba8(overlay), &io.output, "grid")?;
        }
        Command::CellColor { input, x, y } => {
            let image = image::open(&input)?.to_rgb8();
            let color = imaging::cell_color(&image, x.clone(), y.clone())?;
            output::print_cell_color(&x, &y, color);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Write an image and report it.
fn save(image: &DynamicImage, path: &Path, operation: &str) -> Result<(), image::ImageError> {
    image.save(path)?;
    output::print_saved(operation, path, image.dimensions());
    Ok(())
}

/// PNG outputs keep the palette as an indexed image; other formats get
/// the expanded RGB pixels.
fn save_paletted(
    paletted: &imaging::PalettedImage,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if is_png(path) {
        paletted.save_png(path)?;
    } else {
        paletted.to_rgb_image().save(path)?;
    }
    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Grid style from flags, falling back to config values.
fn grid_style(cfg: &PixelArtConfig, color: Option<Rgb<u8>>, width: Option<u32>) -> GridStyle {
    let base = cfg.grid.style();
    GridStyle {
        color: color.unwrap_or(base.color),
        width: width.unwrap_or(base.width),
    }
}

fn parse_color(s: &str) -> Result<Rgb<u8>, String> {
    imaging::parse_hex_color(s).map_err(|e| e.to_string())
}

/// Parse `start..end` into a half-open range.
fn parse_range(s: &str) -> Result<Range<u32>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected start..end, got '{s}'"))?;
    let start: u32 = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid range start '{start}': {e}"))?;
    let end: u32 = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid range end '{end}': {e}"))?;
    if start >= end {
        return Err(format!("range {start}..{end} is empty"));
    }
    Ok(start..end)
}
