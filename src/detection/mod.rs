pub mod classify;
pub mod flood;
pub mod labels;
pub mod overlap;
pub mod preprocessing;
pub mod scale;
pub mod steps;

use image::DynamicImage;
use thiserror::Error;

use crate::loader::{self, ImageSource, LoadError};
use crate::models::{ImageDetectionResult, Orientation};
use classify::Floor;

/// Errors surfaced at the public detection boundary. Everything internal is
/// converted here; no partial result ever escapes.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("container viewport has zero width or height")]
    EmptyViewport,

    #[error("detection failed: {0}")]
    Pipeline(String),
}

/// Detect rooms in a floor plan image.
///
/// Loads and decodes the source, runs the full detection pipeline, and
/// scales the result into a `container_width` x `container_height` viewport.
/// An empty room list is a valid outcome, not an error. The call performs no
/// retries; the caller re-invokes it after a failure.
pub async fn detect(
    source: impl Into<ImageSource>,
    container_width: u32,
    container_height: u32,
) -> Result<ImageDetectionResult, DetectError> {
    let source = source.into();
    if container_width == 0 || container_height == 0 {
        return Err(DetectError::EmptyViewport);
    }

    let floor = Floor::from_path(source.location().unwrap_or(""));
    let img = loader::load(source).await?;

    RoomDetector::new()
        .detect(&img, floor, container_width, container_height)
        .map_err(|e| DetectError::Pipeline(e.to_string()))
}

/// Main detection pipeline orchestrator
pub struct RoomDetector {
    // Detection parameters
    pub ink_threshold: u8,
    pub wall_threshold: u8,
    pub max_overlap_ratio: f32,
    pub verbose: bool,
}

impl RoomDetector {
    pub fn new() -> Self {
        Self {
            ink_threshold: labels::INK_THRESHOLD,
            wall_threshold: flood::WALL_THRESHOLD,
            max_overlap_ratio: overlap::MAX_OVERLAP_RATIO,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the full detection pipeline on a decoded image
    pub fn detect(
        &self,
        img: &DynamicImage,
        floor: Floor,
        container_width: u32,
        container_height: u32,
    ) -> anyhow::Result<ImageDetectionResult> {
        let (img_width, img_height) = (img.width(), img.height());
        anyhow::ensure!(
            img_width > 0 && img_height > 0,
            "image has zero width or height"
        );
        let orientation = Orientation::of(img_width, img_height);

        // Step 1: Grayscale + ink mask
        if self.verbose {
            println!("\nPreprocessing image ({img_width}x{img_height})...");
        }
        let gray = preprocessing::to_grayscale(img);
        let mask = preprocessing::ink_mask(&gray, self.ink_threshold);

        // Step 2: Find label-shaped ink blobs
        if self.verbose {
            println!("\nDetecting text labels...");
        }
        let all_blobs = labels::find_label_blobs(&mask);
        let label_blobs = labels::filter_text_like(all_blobs, img_width, img_height);
        if self.verbose {
            println!("Found {} label candidates", label_blobs.len());
            for (i, blob) in label_blobs.iter().take(10).enumerate() {
                println!(
                    "  Label {}: {}x{} at ({}, {}), density={:.2}",
                    i + 1,
                    blob.width(),
                    blob.height(),
                    blob.min_x,
                    blob.min_y,
                    blob.fill_density()
                );
            }
        }

        // Step 3: Flood fill a region from each label
        if self.verbose {
            println!("\nGrowing regions from {} seeds...", label_blobs.len());
        }
        let regions: Vec<_> = label_blobs
            .iter()
            .map(|blob| flood::grow_region(&gray, blob, self.wall_threshold))
            .collect();

        // Step 4: Filter by size, then classify and name
        let filtered = classify::filter_regions(regions, img_width, img_height);
        if self.verbose {
            println!("{} regions within size bounds", filtered.len());
        }
        let classified = classify::classify_regions(filtered, floor);

        // Step 5: Resolve overlapping detections
        let resolved = overlap::resolve_overlaps(classified, self.max_overlap_ratio);
        if self.verbose {
            println!("{} rooms after overlap resolution", resolved.len());
        }

        // Step 6: Scale into the container viewport
        let rooms = scale::to_container_space(
            resolved,
            img_width,
            img_height,
            container_width,
            container_height,
            floor,
        );
        let confidence_score = scale::aggregate_confidence(&rooms);

        Ok(ImageDetectionResult {
            rooms,
            orientation,
            confidence_score,
        })
    }
}

impl Default for RoomDetector {
    fn default() -> Self {
        Self::new()
    }
}
