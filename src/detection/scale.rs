use crate::detection::classify::Floor;
use crate::models::{ClassifiedRegion, DetectedRoom, Point};

/// Map surviving regions from source-pixel space into the caller's
/// container viewport, rounding to integer pixels. Scaled sides floor at 1
/// so no room ever collapses to zero extent.
pub fn to_container_space(
    regions: Vec<ClassifiedRegion>,
    img_width: u32,
    img_height: u32,
    container_width: u32,
    container_height: u32,
    floor: Floor,
) -> Vec<DetectedRoom> {
    let scale_x = container_width as f32 / img_width as f32;
    let scale_y = container_height as f32 / img_height as f32;
    let run_millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

    regions
        .into_iter()
        .enumerate()
        .map(|(index, classified)| {
            let r = &classified.region;
            let polygon = r
                .polygon
                .iter()
                .map(|p| Point {
                    x: (p.x as f32 * scale_x).round() as i32,
                    y: (p.y as f32 * scale_y).round() as i32,
                })
                .collect();

            DetectedRoom {
                id: format!("room-{}-{}-{}", floor.key(), run_millis, index),
                name: classified.name,
                x: (r.x as f32 * scale_x).round() as i32,
                y: (r.y as f32 * scale_y).round() as i32,
                width: ((r.width as f32 * scale_x).round() as i32).max(1),
                height: ((r.height as f32 * scale_y).round() as i32).max(1),
                confidence: classified.confidence,
                room_type: classified.room_type,
                polygon,
            }
        })
        .collect()
}

/// Mean of the per-room confidences; 0.5 when nothing was detected.
pub fn aggregate_confidence(rooms: &[DetectedRoom]) -> f32 {
    if rooms.is_empty() {
        return 0.5;
    }
    rooms.iter().map(|r| r.confidence).sum::<f32>() / rooms.len() as f32
}
