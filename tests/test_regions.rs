//! Unit-level tests for region classification, overlap resolution,
//! label filtering and floor-key parsing.

use planscan::detection::classify::{self, Floor};
use planscan::detection::labels;
use planscan::detection::overlap::{resolve_overlaps, MAX_OVERLAP_RATIO};
use planscan::models::{rect_ring, ClassifiedRegion, FloodRegion, LabelBlob, RoomType};

fn region(x: u32, y: u32, width: u32, height: u32) -> FloodRegion {
    FloodRegion {
        x,
        y,
        width,
        height,
        pixel_count: width * height,
        polygon: rect_ring(x, y, width, height),
    }
}

fn classified(x: u32, y: u32, width: u32, height: u32) -> ClassifiedRegion {
    let r = region(x, y, width, height);
    ClassifiedRegion {
        room_type: classify::room_type(&r),
        confidence: classify::confidence(&r),
        name: "test".to_string(),
        region: r,
    }
}

#[test]
fn test_room_type_thresholds() {
    // Elongated regions are hallways regardless of area
    assert_eq!(classify::room_type(&region(0, 0, 400, 40)), RoomType::Hallway);
    assert_eq!(classify::room_type(&region(0, 0, 40, 400)), RoomType::Hallway);

    // Compact regions split by area
    assert_eq!(classify::room_type(&region(0, 0, 50, 50)), RoomType::Office);
    assert_eq!(classify::room_type(&region(0, 0, 70, 70)), RoomType::Room);
    assert_eq!(
        classify::room_type(&region(0, 0, 100, 100)),
        RoomType::Laboratory
    );
}

#[test]
fn test_confidence_formula() {
    // Square and mid-sized: base + aspect bonus + area bonus, capped
    assert_eq!(classify::confidence(&region(0, 0, 70, 70)), 0.95);

    // Square but small: base + aspect bonus only
    let c = classify::confidence(&region(0, 0, 50, 50));
    assert!((c - 0.9).abs() < 1e-6);

    // Elongated and out-of-range area: base only
    let c = classify::confidence(&region(0, 0, 400, 40));
    assert!((c - 0.7).abs() < 1e-6);
}

#[test]
fn test_region_size_filter() {
    // 1000x800 image: sides must lie in [2%, 60%] of each dimension
    let kept = classify::filter_regions(
        vec![
            region(10, 10, 5, 5),     // sliver, dropped
            region(10, 10, 100, 80),  // plausible room, kept
            region(10, 10, 700, 80),  // wider than 60%, dropped
            region(10, 10, 100, 500), // taller than 60%, dropped
        ],
        1000,
        800,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!((kept[0].width, kept[0].height), (100, 80));
}

#[test]
fn test_overlap_keeps_larger_region() {
    // B sits mostly inside A (>30% of its own area) and must be dropped
    let a = classified(0, 0, 100, 100);
    let b = classified(10, 10, 50, 50);

    let kept = resolve_overlaps(vec![b, a], MAX_OVERLAP_RATIO);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].region.area(), 100 * 100);
}

#[test]
fn test_overlap_keeps_disjoint_regions() {
    let a = classified(0, 0, 100, 100);
    let b = classified(200, 0, 80, 80);
    // Touching corners only: overlap area stays under the ratio
    let c = classified(100, 100, 60, 60);

    let kept = resolve_overlaps(vec![a, b, c], MAX_OVERLAP_RATIO);
    assert_eq!(kept.len(), 3);
}

#[test]
fn test_overlap_sorts_largest_first() {
    let small = classified(0, 0, 40, 40);
    let large = classified(100, 0, 120, 120);

    let kept = resolve_overlaps(vec![small, large], MAX_OVERLAP_RATIO);
    assert_eq!(kept[0].region.area(), 120 * 120, "largest region leads");
}

#[test]
fn test_label_filter_rejects_wall_like_blobs() {
    let wall_segment = LabelBlob {
        min_x: 0,
        min_y: 0,
        max_x: 399,
        max_y: 2,
        pixel_count: 1200,
    };
    let label = LabelBlob {
        min_x: 50,
        min_y: 50,
        max_x: 73,
        max_y: 61,
        pixel_count: 288,
    };
    let sparse = LabelBlob {
        min_x: 100,
        min_y: 100,
        max_x: 123,
        max_y: 111,
        pixel_count: 20,
    };

    let kept = labels::filter_text_like(vec![wall_segment, label, sparse], 400, 300);
    assert_eq!(kept.len(), 1);
    assert_eq!((kept[0].min_x, kept[0].min_y), (50, 50));
}

#[test]
fn test_floor_key_parsing() {
    assert_eq!(Floor::from_path("plans/ground_floor.png"), Floor::Ground);
    assert_eq!(Floor::from_path("Building-MEZZANINE.png"), Floor::Mezzanine);
    assert_eq!(Floor::from_path("audit/2nd-floor-plan.jpg"), Floor::Second);
    assert_eq!(Floor::from_path("third_floor.png"), Floor::Third);
    assert_eq!(Floor::from_path("basement-b1.png"), Floor::Basement);
    assert_eq!(Floor::from_path("site-overview.png"), Floor::Unknown);
}

#[test]
fn test_floor_name_lists() {
    assert_eq!(Floor::Ground.name_list()[0], "Lobby");
    assert!(Floor::Unknown.name_list().is_empty());
    assert_eq!(Floor::Unknown.key(), "plan");
}
