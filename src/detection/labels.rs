use std::collections::HashMap;

use image::GrayImage;

use crate::models::LabelBlob;

/// Ink pixels darker than this read as candidate label text.
pub const INK_THRESHOLD: u8 = 170;

/// Smallest bounding-box side a label may have, in pixels.
pub const MIN_LABEL_SIZE: u32 = 10;

/// Largest bounding-box side, as a fraction of the smaller image dimension.
pub const MAX_LABEL_FRACTION: f32 = 0.10;

/// Aspect-ratio window for label-shaped blobs. Wall segments are far more
/// elongated than printed names, so they fall outside it.
pub const MIN_LABEL_ASPECT: f32 = 0.2;
pub const MAX_LABEL_ASPECT: f32 = 10.0;

/// Minimum ink coverage of the bounding box. Thin diagonal strokes fail
/// this even when their box is label-sized.
pub const MIN_FILL_DENSITY: f32 = 0.2;

/// Find connected ink blobs in a binary mask (255 = ink).
///
/// Labelling is a single forward pass propagating the minimum neighbour
/// label with 8-connectivity. A diagonal merge discovered late can leave one
/// blob split across two labels; a second pass would repair that, but the
/// size/density filtering downstream tolerates rough segmentation, so the
/// approximation is kept.
pub fn find_label_blobs(mask: &GrayImage) -> Vec<LabelBlob> {
    let (width, height) = mask.dimensions();
    let mut labels: Vec<u32> = vec![0; (width * height) as usize];
    let mut next_label: u32 = 1;

    for y in 0..height {
        for x in 0..width {
            if mask.get_pixel(x, y)[0] == 0 {
                continue;
            }

            // Previously scanned neighbours: W, NW, N, NE.
            let mut best = u32::MAX;
            if x > 0 {
                let l = labels[(y * width + x - 1) as usize];
                if l != 0 {
                    best = best.min(l);
                }
            }
            if y > 0 {
                if x > 0 {
                    let l = labels[((y - 1) * width + x - 1) as usize];
                    if l != 0 {
                        best = best.min(l);
                    }
                }
                let l = labels[((y - 1) * width + x) as usize];
                if l != 0 {
                    best = best.min(l);
                }
                if x + 1 < width {
                    let l = labels[((y - 1) * width + x + 1) as usize];
                    if l != 0 {
                        best = best.min(l);
                    }
                }
            }

            let label = if best == u32::MAX {
                let l = next_label;
                next_label += 1;
                l
            } else {
                best
            };
            labels[(y * width + x) as usize] = label;
        }
    }

    // Accumulate bounding box and pixel count per label.
    let mut blobs: HashMap<u32, LabelBlob> = HashMap::new();
    for y in 0..height {
        for x in 0..width {
            let label = labels[(y * width + x) as usize];
            if label == 0 {
                continue;
            }
            blobs
                .entry(label)
                .and_modify(|b| {
                    b.min_x = b.min_x.min(x);
                    b.min_y = b.min_y.min(y);
                    b.max_x = b.max_x.max(x);
                    b.max_y = b.max_y.max(y);
                    b.pixel_count += 1;
                })
                .or_insert(LabelBlob {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    pixel_count: 1,
                });
        }
    }

    // Reading order, so downstream naming is stable across runs.
    let mut blobs: Vec<LabelBlob> = blobs.into_values().collect();
    blobs.sort_by_key(|b| (b.min_y, b.min_x));
    blobs
}

/// Keep only blobs whose geometry matches printed room-name text: small
/// enough to be a label, big enough to not be noise, moderately elongated,
/// and dense enough to be a solid block of glyphs.
pub fn filter_text_like(blobs: Vec<LabelBlob>, img_width: u32, img_height: u32) -> Vec<LabelBlob> {
    let max_size = (img_width.min(img_height) as f32 * MAX_LABEL_FRACTION) as u32;

    blobs
        .into_iter()
        .filter(|b| {
            let w = b.width();
            let h = b.height();
            let aspect = b.aspect_ratio();
            w >= MIN_LABEL_SIZE
                && h >= MIN_LABEL_SIZE
                && w <= max_size
                && h <= max_size
                && aspect >= MIN_LABEL_ASPECT
                && aspect <= MAX_LABEL_ASPECT
                && b.fill_density() >= MIN_FILL_DENSITY
        })
        .collect()
}
