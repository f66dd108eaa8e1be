use image::{DynamicImage, GrayImage};
use imageproc::contrast::{threshold, ThresholdType};

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Binary ink mask: pixels darker than `ink_threshold` become white (255),
/// everything else black. Room labels, walls and other printed marks are
/// ink; the paper field is not.
pub fn ink_mask(gray: &GrayImage, ink_threshold: u8) -> GrayImage {
    threshold(gray, ink_threshold, ThresholdType::BinaryInverted)
}
