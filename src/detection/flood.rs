use std::collections::VecDeque;

use image::GrayImage;

use crate::models::{rect_ring, FloodRegion, LabelBlob};

/// Pixels at or above this luminance are room interior; anything darker is
/// treated as a wall and stops the fill.
pub const WALL_THRESHOLD: u8 = 180;

/// How close a fill's bounding box may come to the image border before the
/// region is presumed to have leaked out of the floor plan.
pub const EDGE_MARGIN: u32 = 2;

/// Side of the replacement square for leaked regions, as a fraction of the
/// smaller image dimension. Inherited constant; kept as-is.
pub const LEAK_SQUARE_FRACTION: f32 = 0.10;

/// Grow the room enclosing `label` by breadth-first flood fill from its
/// centroid.
///
/// A pixel joins the region when its luminance clears [`WALL_THRESHOLD`],
/// or when it lies inside the label's own bounding box: the seed sits on
/// the label's ink, and the fill has to escape the glyphs before it can
/// reach the room interior.
///
/// If the fill reaches within [`EDGE_MARGIN`] of any image border, no
/// enclosing wall was found and the grown extent is invalid; the region is
/// replaced by a small synthetic square centered on the seed.
pub fn grow_region(gray: &GrayImage, label: &LabelBlob, wall_threshold: u8) -> FloodRegion {
    let (width, height) = gray.dimensions();
    let (seed_x, seed_y) = label.center();

    let mut visited = vec![false; (width * height) as usize];
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

    let mut min_x = seed_x;
    let mut min_y = seed_y;
    let mut max_x = seed_x;
    let mut max_y = seed_y;
    let mut pixel_count: u32 = 0;

    visited[(seed_y * width + seed_x) as usize] = true;
    queue.push_back((seed_x, seed_y));

    while let Some((x, y)) = queue.pop_front() {
        pixel_count += 1;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        let neighbours = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbours {
            if nx >= width || ny >= height {
                continue;
            }
            let idx = (ny * width + nx) as usize;
            if visited[idx] {
                continue;
            }
            let passable =
                gray.get_pixel(nx, ny)[0] >= wall_threshold || label.contains(nx, ny);
            if passable {
                visited[idx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    let leaked = min_x <= EDGE_MARGIN
        || min_y <= EDGE_MARGIN
        || max_x + EDGE_MARGIN >= width - 1
        || max_y + EDGE_MARGIN >= height - 1;

    if leaked {
        return leak_replacement(width, height, seed_x, seed_y);
    }

    let w = max_x - min_x + 1;
    let h = max_y - min_y + 1;
    FloodRegion {
        x: min_x,
        y: min_y,
        width: w,
        height: h,
        pixel_count,
        polygon: rect_ring(min_x, min_y, w, h),
    }
}

/// Synthetic square standing in for a fill that escaped the floor plan:
/// side 10% of the smaller image dimension, centered on the seed, clamped
/// to the image.
fn leak_replacement(width: u32, height: u32, seed_x: u32, seed_y: u32) -> FloodRegion {
    let side = ((width.min(height) as f32 * LEAK_SQUARE_FRACTION) as u32).max(1);
    let half = side / 2;

    let x = seed_x.saturating_sub(half).min(width.saturating_sub(side));
    let y = seed_y.saturating_sub(half).min(height.saturating_sub(side));

    FloodRegion {
        x,
        y,
        width: side,
        height: side,
        pixel_count: side * side,
        polygon: rect_ring(x, y, side, side),
    }
}
