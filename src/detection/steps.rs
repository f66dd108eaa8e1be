use crate::detection::classify::{self, Floor};
use crate::detection::{flood, labels, overlap, preprocessing};
use crate::models::{rect_ring, FloodRegion, LabelBlob};
use crate::pipeline::{BoundingBox, MetadataValue, PipelineContext, PipelineData, PipelineStep};
use anyhow::Result;

/// Rebuild the source-space region a pipeline item stands for.
fn region_of(item: &PipelineData) -> Result<FloodRegion> {
    let bbox = item
        .bbox
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("item has no region bounding box"))?;
    let pixel_count = item.get_int("pixel_count").unwrap_or(0) as u32;
    Ok(FloodRegion {
        x: bbox.x,
        y: bbox.y,
        width: bbox.width,
        height: bbox.height,
        pixel_count,
        polygon: rect_ring(bbox.x, bbox.y, bbox.width, bbox.height),
    })
}

/// Convert the plan to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let gray = preprocessing::to_grayscale(&item.image);
            let new_item = PipelineData {
                image: image::DynamicImage::ImageLuma8(gray),
                original: item.original.clone(),
                bbox: item.bbox.clone(),
                metadata: item.metadata.clone(),
            };
            result.push(new_item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Binarize into an ink mask
pub struct InkMaskStep {
    pub ink_threshold: u8,
}

impl PipelineStep for InkMaskStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let gray = item.image.to_luma8();
            let mask = preprocessing::ink_mask(&gray, self.ink_threshold);
            let new_item = PipelineData {
                image: image::DynamicImage::ImageLuma8(mask),
                original: item.original.clone(),
                bbox: item.bbox.clone(),
                metadata: item.metadata.clone(),
            };
            result.push(new_item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Ink Mask"
    }
}

/// Find text-label blobs in the ink mask - splits one plan into many label items
pub struct LabelDetectionStep;

impl PipelineStep for LabelDetectionStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let mask = item.image.to_luma8();
            let (img_width, img_height) = (item.original.width(), item.original.height());
            let blobs = labels::find_label_blobs(&mask);
            let label_blobs = labels::filter_text_like(blobs, img_width, img_height);

            if context.verbose {
                println!("  {} label candidates", label_blobs.len());
            }

            // Each label becomes its own PipelineData
            for blob in label_blobs {
                let bbox = BoundingBox {
                    x: blob.min_x,
                    y: blob.min_y,
                    width: blob.width(),
                    height: blob.height(),
                };
                let cropped = item
                    .original
                    .crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);

                let mut label_data =
                    PipelineData::from_region(cropped, item.original.clone(), bbox);
                label_data.metadata.insert(
                    "label_min_x".to_string(),
                    MetadataValue::Int(blob.min_x as i32),
                );
                label_data.metadata.insert(
                    "label_min_y".to_string(),
                    MetadataValue::Int(blob.min_y as i32),
                );
                label_data.metadata.insert(
                    "label_max_x".to_string(),
                    MetadataValue::Int(blob.max_x as i32),
                );
                label_data.metadata.insert(
                    "label_max_y".to_string(),
                    MetadataValue::Int(blob.max_y as i32),
                );
                label_data.metadata.insert(
                    "pixel_count".to_string(),
                    MetadataValue::Int(blob.pixel_count as i32),
                );
                result.push(label_data);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Label Detection"
    }
}

/// Grow a room region from each label seed
pub struct FloodFillStep {
    pub wall_threshold: u8,
}

impl PipelineStep for FloodFillStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            // Reconstruct the seeding label from metadata
            let min_x = item
                .get_int("label_min_x")
                .ok_or_else(|| anyhow::anyhow!("Missing label_min_x"))?
                as u32;
            let min_y = item
                .get_int("label_min_y")
                .ok_or_else(|| anyhow::anyhow!("Missing label_min_y"))?
                as u32;
            let max_x = item
                .get_int("label_max_x")
                .ok_or_else(|| anyhow::anyhow!("Missing label_max_x"))?
                as u32;
            let max_y = item
                .get_int("label_max_y")
                .ok_or_else(|| anyhow::anyhow!("Missing label_max_y"))?
                as u32;
            let pixel_count = item
                .get_int("pixel_count")
                .ok_or_else(|| anyhow::anyhow!("Missing pixel_count"))?
                as u32;

            let blob = LabelBlob {
                min_x,
                min_y,
                max_x,
                max_y,
                pixel_count,
            };

            let gray = item.original.to_luma8();
            let region = flood::grow_region(&gray, &blob, self.wall_threshold);

            let bbox = BoundingBox {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            };
            let cropped = item
                .original
                .crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);

            let mut region_data = PipelineData::from_region(cropped, item.original.clone(), bbox);
            region_data.metadata.insert(
                "pixel_count".to_string(),
                MetadataValue::Int(region.pixel_count as i32),
            );
            result.push(region_data);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Flood Fill"
    }
}

/// Discard regions outside the plausible room-size window
pub struct RegionFilterStep;

impl PipelineStep for RegionFilterStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let region = region_of(&item)?;
            let (img_width, img_height) = (item.original.width(), item.original.height());
            let kept = classify::filter_regions(vec![region], img_width, img_height);
            if !kept.is_empty() {
                result.push(item);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Region Filtering"
    }
}

/// Classify, name and score surviving regions
pub struct ClassifyStep {
    pub floor: Floor,
}

impl PipelineStep for ClassifyStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let names = self.floor.name_list();
        let mut result = Vec::new();

        for (index, item) in data.into_iter().enumerate() {
            let region = region_of(&item)?;
            let room_type = classify::room_type(&region);
            let confidence = classify::confidence(&region);
            let name = match names.get(index) {
                Some(n) => n.to_string(),
                None => format!("{} {}", room_type.as_str(), index + 1),
            };

            let new_item = item
                .with_metadata(
                    "room_type",
                    MetadataValue::String(room_type.as_str().to_string()),
                )
                .with_metadata("room_name", MetadataValue::String(name))
                .with_metadata("confidence", MetadataValue::Float(confidence));
            result.push(new_item);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Classification"
    }
}

/// Drop regions duplicating an already-accepted larger one - acts on the whole set
pub struct OverlapResolveStep {
    pub max_overlap_ratio: f32,
}

impl PipelineStep for OverlapResolveStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut items: Vec<(FloodRegion, PipelineData)> = Vec::new();
        for item in data {
            items.push((region_of(&item)?, item));
        }
        items.sort_by(|a, b| b.0.area().cmp(&a.0.area()));

        let mut accepted: Vec<(FloodRegion, PipelineData)> = Vec::new();
        for (region, item) in items {
            let own_area = region.area();
            if own_area == 0 {
                continue;
            }
            let duplicate = accepted.iter().any(|(kept, _)| {
                region.intersection_area(kept) as f32 / own_area as f32 > self.max_overlap_ratio
            });
            if !duplicate {
                accepted.push((region, item));
            }
        }

        Ok(accepted.into_iter().map(|(_, item)| item).collect())
    }

    fn name(&self) -> &str {
        "Overlap Resolution"
    }
}

/// Map region coordinates into the container viewport
pub struct ScaleStep {
    pub container_width: u32,
    pub container_height: u32,
    pub floor: Floor,
}

impl PipelineStep for ScaleStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let run_millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let mut result = Vec::new();

        for (index, item) in data.into_iter().enumerate() {
            let bbox = item
                .bbox
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("item has no region bounding box"))?;
            let scale_x = self.container_width as f32 / item.original.width() as f32;
            let scale_y = self.container_height as f32 / item.original.height() as f32;

            let x = (bbox.x as f32 * scale_x).round() as i32;
            let y = (bbox.y as f32 * scale_y).round() as i32;
            let width = ((bbox.width as f32 * scale_x).round() as i32).max(1);
            let height = ((bbox.height as f32 * scale_y).round() as i32).max(1);
            let id = format!("room-{}-{}-{}", self.floor.key(), run_millis, index);

            let new_item = item
                .with_metadata("room_id", MetadataValue::String(id))
                .with_metadata("x", MetadataValue::Int(x))
                .with_metadata("y", MetadataValue::Int(y))
                .with_metadata("width", MetadataValue::Int(width))
                .with_metadata("height", MetadataValue::Int(height));
            result.push(new_item);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Coordinate Scaling"
    }
}

/// Build the standard detection pipeline from the composable step system
pub fn build_standard_pipeline(
    floor: Floor,
    container_width: u32,
    container_height: u32,
    verbose: bool,
) -> crate::pipeline::Pipeline {
    use crate::pipeline::Pipeline;
    use std::sync::Arc;

    Pipeline::new()
        .with_verbose(verbose)
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(InkMaskStep {
            ink_threshold: labels::INK_THRESHOLD,
        }))
        .add_step(Arc::new(LabelDetectionStep))
        .add_step(Arc::new(FloodFillStep {
            wall_threshold: flood::WALL_THRESHOLD,
        }))
        .add_step(Arc::new(RegionFilterStep))
        .add_step(Arc::new(ClassifyStep { floor }))
        .add_step(Arc::new(OverlapResolveStep {
            max_overlap_ratio: overlap::MAX_OVERLAP_RATIO,
        }))
        .add_step(Arc::new(ScaleStep {
            container_width,
            container_height,
            floor,
        }))
}
