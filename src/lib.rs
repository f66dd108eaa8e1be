pub mod detection;
pub mod loader;
pub mod models;
pub mod pipeline;

pub use detection::{detect, DetectError, RoomDetector};
pub use detection::classify::Floor;
pub use loader::{ImageSource, LoadError};
pub use models::{
    DetectedRoom, ImageDetectionResult, LabelBlob, Orientation, Point, RoomType,
};
pub use pipeline::{
    BoundingBox, DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData,
    PipelineStep,
};
