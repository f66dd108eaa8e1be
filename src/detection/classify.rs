use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ClassifiedRegion, FloodRegion, RoomType};

/// Region side bounds as fractions of the matching image dimension.
/// Anything smaller is noise; anything larger is a whole-image false
/// positive.
pub const MIN_REGION_FRACTION: f32 = 0.02;
pub const MAX_REGION_FRACTION: f32 = 0.60;

/// Which floor of the building a plan depicts, recovered from the image
/// path. Controls the predefined room-name list and the room-id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor {
    Basement,
    Ground,
    Mezzanine,
    Second,
    Third,
    Unknown,
}

static FLOOR_PATTERNS: Lazy<Vec<(Regex, Floor)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)basement|bsmt").unwrap(), Floor::Basement),
        (Regex::new(r"(?i)mezz").unwrap(), Floor::Mezzanine),
        (Regex::new(r"(?i)2nd|second").unwrap(), Floor::Second),
        (Regex::new(r"(?i)3rd|third").unwrap(), Floor::Third),
        (Regex::new(r"(?i)ground|1st|first").unwrap(), Floor::Ground),
    ]
});

impl Floor {
    /// Match known floor markers in an image path or URL.
    pub fn from_path(path: &str) -> Floor {
        for (pattern, floor) in FLOOR_PATTERNS.iter() {
            if pattern.is_match(path) {
                return *floor;
            }
        }
        Floor::Unknown
    }

    /// Short key used inside generated room ids.
    pub fn key(&self) -> &'static str {
        match self {
            Floor::Basement => "basement",
            Floor::Ground => "ground",
            Floor::Mezzanine => "mezzanine",
            Floor::Second => "second",
            Floor::Third => "third",
            Floor::Unknown => "plan",
        }
    }

    /// Predefined room names for this floor, assigned in detection order.
    /// Once the list is exhausted the classifier synthesizes names.
    pub fn name_list(&self) -> &'static [&'static str] {
        match self {
            Floor::Basement => &[
                "Mechanical Room",
                "Electrical Room",
                "Boiler Room",
                "Storage B1",
            ],
            Floor::Ground => &[
                "Lobby",
                "Reception",
                "Main Office",
                "Conference Room",
                "Server Room",
                "Break Room",
                "Storage",
            ],
            Floor::Mezzanine => &[
                "Open Plan Office",
                "Meeting Room",
                "Print Room",
                "Archive",
            ],
            Floor::Second => &[
                "Office 201",
                "Office 202",
                "Laboratory A",
                "Laboratory B",
                "Meeting Room 2",
            ],
            Floor::Third => &["Office 301", "Office 302", "Studio", "Plant Room"],
            Floor::Unknown => &[],
        }
    }
}

/// Discard regions outside the plausible room-size window for this image.
pub fn filter_regions(
    regions: Vec<FloodRegion>,
    img_width: u32,
    img_height: u32,
) -> Vec<FloodRegion> {
    let min_w = img_width as f32 * MIN_REGION_FRACTION;
    let max_w = img_width as f32 * MAX_REGION_FRACTION;
    let min_h = img_height as f32 * MIN_REGION_FRACTION;
    let max_h = img_height as f32 * MAX_REGION_FRACTION;

    regions
        .into_iter()
        .filter(|r| {
            let w = r.width as f32;
            let h = r.height as f32;
            w >= min_w && w <= max_w && h >= min_h && h <= max_h
        })
        .collect()
}

/// Assign a room type from geometry alone. Label text is never read; only
/// its position seeded the region.
pub fn room_type(region: &FloodRegion) -> RoomType {
    let aspect = region.aspect_ratio();
    if aspect < 0.3 || aspect > 3.5 {
        return RoomType::Hallway;
    }
    let area = region.area();
    if area < 3000 {
        RoomType::Office
    } else if area > 8000 {
        RoomType::Laboratory
    } else {
        RoomType::Room
    }
}

/// Heuristic confidence that a region is a genuine room: rooms tend to be
/// roughly square and of moderate area. Not a calibrated probability.
pub fn confidence(region: &FloodRegion) -> f32 {
    let mut score: f32 = 0.7;
    let aspect = region.aspect_ratio();
    if aspect > 0.7 && aspect < 1.5 {
        score += 0.2;
    }
    let area = region.area();
    if area > 3000 && area < 15000 {
        score += 0.1;
    }
    score.min(0.95)
}

/// Classify and name filtered regions in detection order.
pub fn classify_regions(regions: Vec<FloodRegion>, floor: Floor) -> Vec<ClassifiedRegion> {
    let names = floor.name_list();

    regions
        .into_iter()
        .enumerate()
        .map(|(index, region)| {
            let room_type = room_type(&region);
            let name = match names.get(index) {
                Some(n) => n.to_string(),
                None => format!("{} {}", room_type.as_str(), index + 1),
            };
            let confidence = confidence(&region);
            ClassifiedRegion {
                region,
                room_type,
                name,
                confidence,
            }
        })
        .collect()
}
