use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Luminance used for wall strokes; darker than the wall threshold (180).
pub const WALL_SHADE: u8 = 60;

/// Luminance used for label blocks; darker than the ink threshold (170).
pub const LABEL_SHADE: u8 = 40;

/// Wall stroke thickness in pixels.
pub const WALL_THICKNESS: u32 = 3;

/// Blank white plan with no ink at all.
pub fn blank_plan(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255u8])))
}

/// Draw a walled room: a dark footprint rectangle with the interior
/// repainted white, leaving a wall ring of WALL_THICKNESS.
pub fn draw_room(canvas: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
    draw_filled_rect_mut(
        canvas,
        Rect::at(x as i32, y as i32).of_size(width, height),
        Luma([WALL_SHADE]),
    );
    let t = WALL_THICKNESS;
    draw_filled_rect_mut(
        canvas,
        Rect::at((x + t) as i32, (y + t) as i32).of_size(width - 2 * t, height - 2 * t),
        Luma([255u8]),
    );
}

/// Draw a solid label block centered on (cx, cy).
pub fn draw_label(canvas: &mut GrayImage, cx: u32, cy: u32, width: u32, height: u32) {
    draw_filled_rect_mut(
        canvas,
        Rect::at((cx - width / 2) as i32, (cy - height / 2) as i32).of_size(width, height),
        Luma([LABEL_SHADE]),
    );
}

/// A 400x300 plan with two labelled rooms:
/// - room A at (40, 40), 140x110 footprint
/// - room B at (220, 60), 120x160 footprint
pub fn simple_plan() -> DynamicImage {
    let mut canvas = GrayImage::from_pixel(400, 300, Luma([255u8]));
    draw_room(&mut canvas, 40, 40, 140, 110);
    draw_label(&mut canvas, 110, 95, 24, 12);
    draw_room(&mut canvas, 220, 60, 120, 160);
    draw_label(&mut canvas, 280, 140, 24, 12);
    DynamicImage::ImageLuma8(canvas)
}

/// A 500x400 plan with a single label and no walls anywhere, so any flood
/// fill from the label runs off the image edge.
pub fn unwalled_plan() -> DynamicImage {
    let mut canvas = GrayImage::from_pixel(500, 400, Luma([255u8]));
    draw_label(&mut canvas, 251, 195, 24, 12);
    DynamicImage::ImageLuma8(canvas)
}

/// Encode a plan as PNG bytes.
pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .expect("Failed to encode test image");
    bytes
}
