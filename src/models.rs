use serde::Serialize;

/// A point in either source-pixel or container space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Orientation of the source image, derived from width vs height.
/// Square images count as landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Room type assigned from geometry alone. Label text is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoomType {
    Hallway,
    Office,
    Laboratory,
    Room,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Hallway => "Hallway",
            RoomType::Office => "Office",
            RoomType::Laboratory => "Laboratory",
            RoomType::Room => "Room",
        }
    }
}

/// A connected blob of ink pixels with the geometric signature of printed
/// room-label text.
#[derive(Debug, Clone)]
pub struct LabelBlob {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
}

impl LabelBlob {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn aspect_ratio(&self) -> f32 {
        let h = self.height() as f32;
        if h == 0.0 {
            return 0.0;
        }
        self.width() as f32 / h
    }

    /// Fraction of the bounding box covered by ink pixels.
    pub fn fill_density(&self) -> f32 {
        let area = (self.width() * self.height()) as f32;
        if area == 0.0 {
            return 0.0;
        }
        self.pixel_count as f32 / area
    }

    /// Get center coordinates
    pub fn center(&self) -> (u32, u32) {
        ((self.min_x + self.max_x) / 2, (self.min_y + self.max_y) / 2)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// The room-sized area recovered by flood filling outward from one label.
/// Coordinates are in source-pixel space.
#[derive(Debug, Clone)]
pub struct FloodRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pixel_count: u32,
    /// Closed ring outlining the region. Currently always the four corners
    /// of the bounding box; the contract allows a traced contour later.
    pub polygon: Vec<Point>,
}

impl FloodRegion {
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Overlap area with another region, in square pixels.
    pub fn intersection_area(&self, other: &FloodRegion) -> u32 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            return 0;
        }
        (right - left) * (bottom - top)
    }
}

/// Rectangle ring used as the default polygon for a region.
pub fn rect_ring(x: u32, y: u32, width: u32, height: u32) -> Vec<Point> {
    let (x, y) = (x as i32, y as i32);
    let (w, h) = (width as i32, height as i32);
    vec![
        Point { x, y },
        Point { x: x + w, y },
        Point { x: x + w, y: y + h },
        Point { x, y: y + h },
    ]
}

/// A flood region with its classification attached, still in source-pixel
/// space. Produced by the classifier, consumed by the overlap resolver and
/// the coordinate scaler.
#[derive(Debug, Clone)]
pub struct ClassifiedRegion {
    pub region: FloodRegion,
    pub room_type: RoomType,
    pub name: String,
    pub confidence: f32,
}

/// The externally visible unit of output. Coordinates are in container
/// space; `id` is freshly generated per detection run.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedRoom {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub polygon: Vec<Point>,
}

/// Aggregate result of one detection call.
#[derive(Debug, Clone, Serialize)]
pub struct ImageDetectionResult {
    pub rooms: Vec<DetectedRoom>,
    pub orientation: Orientation,
    #[serde(rename = "confidenceScore")]
    pub confidence_score: f32,
}
