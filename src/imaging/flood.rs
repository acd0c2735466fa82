//! Exact-match flood fill.
//!
//! The `image` crate has no flood fill, so this is a plain 4-connected BFS.
//! A pixel joins the region only if it equals the seed's color exactly
//! (zero tolerance). An explicit visited bitmap guarantees each pixel is
//! queued at most once.

use image::{ImageBuffer, Pixel};
use std::collections::VecDeque;

/// Replace the 4-connected region of pixels matching the color at
/// `(seed_x, seed_y)` with `fill`, in place.
///
/// Returns the number of pixels changed. A seed outside the image, or a seed
/// that already holds `fill`, changes nothing.
pub fn flood_fill<P>(
    image: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    seed_x: u32,
    seed_y: u32,
    fill: P,
) -> usize
where
    P: Pixel + PartialEq,
{
    let (width, height) = image.dimensions();
    if seed_x >= width || seed_y >= height {
        return 0;
    }
    let target = *image.get_pixel(seed_x, seed_y);
    if target == fill {
        return 0;
    }

    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();
    visited[index(seed_x, seed_y)] = true;
    queue.push_back((seed_x, seed_y));

    let mut filled = 0;
    while let Some((x, y)) = queue.pop_front() {
        image.put_pixel(x, y, fill);
        filled += 1;

        let neighbors = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1).filter(|&nx| nx < width), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1).filter(|&ny| ny < height)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            let i = index(nx, ny);
            if !visited[i] && *image.get_pixel(nx, ny) == target {
                visited[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn fills_uniform_image_completely() {
        let mut img = RgbaImage::from_pixel(5, 4, WHITE);
        assert_eq!(flood_fill(&mut img, 0, 0, CLEAR), 20);
        assert!(img.pixels().all(|p| *p == CLEAR));
    }

    #[test]
    fn stops_at_different_colors() {
        // Vertical black wall at x = 2 splits the canvas in two.
        let mut img = RgbaImage::from_fn(5, 3, |x, _| if x == 2 { BLACK } else { WHITE });
        assert_eq!(flood_fill(&mut img, 0, 0, CLEAR), 6);
        assert_eq!(*img.get_pixel(1, 2), CLEAR);
        assert_eq!(*img.get_pixel(2, 1), BLACK);
        assert_eq!(*img.get_pixel(3, 0), WHITE);
    }

    #[test]
    fn diagonal_neighbors_are_not_connected() {
        // Checkerboard: white cells only touch each other diagonally.
        let mut img =
            RgbaImage::from_fn(3, 3, |x, y| if (x + y) % 2 == 0 { WHITE } else { BLACK });
        assert_eq!(flood_fill(&mut img, 0, 0, CLEAR), 1);
        assert_eq!(*img.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn zero_tolerance_skips_near_matches() {
        let almost_white = Rgba([254, 255, 255, 255]);
        let mut img = RgbaImage::from_fn(3, 1, |x, _| if x == 1 { almost_white } else { WHITE });
        assert_eq!(flood_fill(&mut img, 0, 0, CLEAR), 1);
        assert_eq!(*img.get_pixel(1, 0), almost_white);
        assert_eq!(*img.get_pixel(2, 0), WHITE);
    }

    #[test]
    fn seed_already_fill_color_is_noop() {
        let mut img = RgbaImage::from_pixel(2, 2, CLEAR);
        assert_eq!(flood_fill(&mut img, 1, 1, CLEAR), 0);
    }

    #[test]
    fn seed_outside_image_is_noop() {
        let mut img = RgbaImage::from_pixel(2, 2, WHITE);
        assert_eq!(flood_fill(&mut img, 2, 0, CLEAR), 0);
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn fills_winding_region() {
        // S-shaped white path through a black field.
        let rows = ["WWW", "BBW", "WWW", "WBB", "WWW"];
        let mut img = RgbaImage::from_fn(3, 5, |x, y| {
            if rows[y as usize].as_bytes()[x as usize] == b'W' {
                WHITE
            } else {
                BLACK
            }
        });
        assert_eq!(flood_fill(&mut img, 0, 0, CLEAR), 11);
        assert_eq!(*img.get_pixel(2, 4), CLEAR);
    }
}
