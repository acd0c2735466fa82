//! CLI output formatting for all subcommands.
//!
//! Every command reports what it produced: the primary line names the
//! operation and the written file, with image details shown as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Saved image
//!
//! ```text
//! flatten → sprite-flat.png
//!     Size: 32x32
//! ```
//!
//! ## Palette
//!
//! ```text
//! palette → sprite-palette.png
//!     Size: 32x32
//!     Colors: 3 (max-coverage)
//!     000 #000000  512 px
//!     001 #ff0000  384 px
//!     002 #ffffff  128 px
//! ```
//!
//! ## Cell color
//!
//! ```text
//! Cell x 0..4, y 0..4 → #ff0000
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::imaging::{PalettedImage, QuantizeMethod, to_hex};
use image::Rgb;
use std::ops::Range;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 0-based palette index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line: operation name and the written file.
fn saved_header(operation: &str, path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("{} → {}", operation, name)
}

fn size_line(dimensions: (u32, u32)) -> String {
    format!("{}Size: {}x{}", indent(1), dimensions.0, dimensions.1)
}

// ============================================================================
// Saved images
// ============================================================================

/// Format the report for a command that wrote a single image.
pub fn format_saved(operation: &str, path: &Path, dimensions: (u32, u32)) -> Vec<String> {
    vec![saved_header(operation, path), size_line(dimensions)]
}

pub fn print_saved(operation: &str, path: &Path, dimensions: (u32, u32)) {
    for line in format_saved(operation, path, dimensions) {
        println!("{}", line);
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Format the report for a palette reduction: header, size, then one line
/// per palette entry with its hex color and pixel count.
pub fn format_palette_output(
    path: &Path,
    paletted: &PalettedImage,
    method: QuantizeMethod,
) -> Vec<String> {
    let mut lines = vec![
        saved_header("palette", path),
        size_line(paletted.dimensions()),
        format!(
            "{}Colors: {} ({})",
            indent(1),
            paletted.num_colors(),
            method
        ),
    ];
    let counts = paletted.color_counts();
    for (i, (color, count)) in paletted.palette().iter().zip(counts).enumerate() {
        lines.push(format!(
            "{}{} {}  {} px",
            indent(1),
            format_index(i),
            to_hex(*color),
            count
        ));
    }
    lines
}

pub fn print_palette_output(path: &Path, paletted: &PalettedImage, method: QuantizeMethod) {
    for line in format_palette_output(path, paletted, method) {
        println!("{}", line);
    }
}

// ============================================================================
// Cell color
// ============================================================================

pub fn format_cell_color(columns: &Range<u32>, rows: &Range<u32>, color: Rgb<u8>) -> String {
    format!(
        "Cell x {}..{}, y {}..{} → {}",
        columns.start,
        columns.end,
        rows.start,
        rows.end,
        to_hex(color)
    )
}

pub fn print_cell_color(columns: &Range<u32>, rows: &Range<u32>, color: Rgb<u8>) {
    println!("{}", format_cell_color(columns, rows, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(0), "000");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(255), "255");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn saved_header_uses_file_name() {
        let path = PathBuf::from("out/dir/sprite-flat.png");
        assert_eq!(saved_header("flatten", &path), "flatten → sprite-flat.png");
    }

    #[test]
    fn saved_header_falls_back_to_full_path() {
        assert_eq!(saved_header("scale", Path::new("/")), "scale → /");
    }

    // =========================================================================
    // Command output tests
    // =========================================================================

    #[test]
    fn format_saved_lines() {
        let lines = format_saved("crop", Path::new("a.png"), (30, 20));
        assert_eq!(lines, vec!["crop → a.png", "    Size: 30x20"]);
    }

    #[test]
    fn format_palette_output_lists_entries_with_counts() {
        let paletted = PalettedImage::new(
            2,
            2,
            vec![Rgb([0, 0, 0]), Rgb([255, 0, 0])],
            vec![1, 1, 0, 1],
        )
        .unwrap();
        let lines =
            format_palette_output(Path::new("p.png"), &paletted, QuantizeMethod::FastOctree);
        assert_eq!(
            lines,
            vec![
                "palette → p.png",
                "    Size: 2x2",
                "    Colors: 2 (fast-octree)",
                "    000 #000000  1 px",
                "    001 #ff0000  3 px",
            ]
        );
    }

    #[test]
    fn format_cell_color_line() {
        let line = format_cell_color(&(0..4), &(2..6), Rgb([255, 0, 0]));
        assert_eq!(line, "Cell x 0..4, y 2..6 → #ff0000");
    }
}
