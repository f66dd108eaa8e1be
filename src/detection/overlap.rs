use crate::models::ClassifiedRegion;

/// Overlap-area / own-area ratio above which a region is considered a
/// duplicate of an already-accepted one.
pub const MAX_OVERLAP_RATIO: f32 = 0.3;

/// Drop regions that mostly cover an already-accepted larger region.
///
/// Several labels inside one physical room (a room name plus a furniture
/// caption) each seed their own fill and land on near-identical extents.
/// Keeping the largest region of each overlapping cluster is a conservative
/// dedup; rejected regions are dropped, never merged.
pub fn resolve_overlaps(
    mut regions: Vec<ClassifiedRegion>,
    max_overlap_ratio: f32,
) -> Vec<ClassifiedRegion> {
    regions.sort_by(|a, b| b.region.area().cmp(&a.region.area()));

    let mut accepted: Vec<ClassifiedRegion> = Vec::new();
    for candidate in regions {
        let own_area = candidate.region.area();
        if own_area == 0 {
            continue;
        }
        let duplicate = accepted.iter().any(|kept| {
            let overlap = candidate.region.intersection_area(&kept.region);
            overlap as f32 / own_area as f32 > max_overlap_ratio
        });
        if !duplicate {
            accepted.push(candidate);
        }
    }
    accepted
}
