use clap::Parser;
use std::path::PathBuf;

use planscan::detection::steps::build_standard_pipeline;
use planscan::{Floor, ImageSource, RoomDetector};

#[derive(Parser)]
#[command(name = "planscan")]
#[command(about = "Detect rooms in floor plan images")]
struct Cli {
    /// Path or URL of the floor plan image
    #[arg(value_name = "IMAGE")]
    image: String,

    /// Container viewport width in pixels (defaults to the image width)
    #[arg(long)]
    width: Option<u32>,

    /// Container viewport height in pixels (defaults to the image height)
    #[arg(long)]
    height: Option<u32>,

    /// Print the detection result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save per-stage debug images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.verbose {
        println!("Loading image: {}", args.image);
    }

    let source = ImageSource::from(args.image.as_str());
    let floor = Floor::from_path(args.image.as_str());
    let img = planscan::loader::load(source).await?;

    let container_width = args.width.unwrap_or(img.width());
    let container_height = args.height.unwrap_or(img.height());

    if args.verbose {
        println!(
            "Image loaded: {}x{}, viewport {}x{}, floor key '{}'\n",
            img.width(),
            img.height(),
            container_width,
            container_height,
            floor.key()
        );
    }

    // Debug mode runs the composable pipeline so every stage gets dumped
    if let Some(debug_dir) = args.debug_out {
        let mut pipeline =
            build_standard_pipeline(floor, container_width, container_height, args.verbose)
                .with_debug(debug_dir)?;
        let results = pipeline.run(img)?;

        println!("\n=== Room Detection Results ===");
        println!("Total rooms detected: {}", results.len());
        for item in &results {
            if let (Some(name), Some(room_type), Some(confidence)) = (
                item.get_string("room_name"),
                item.get_string("room_type"),
                item.get_float("confidence"),
            ) {
                let x = item.get_int("x").unwrap_or(0);
                let y = item.get_int("y").unwrap_or(0);
                println!(
                    "  {} ({}) at ({}, {}) - confidence: {:.2}",
                    name, room_type, x, y, confidence
                );
            }
        }
        return Ok(());
    }

    let detector = RoomDetector::new().with_verbose(args.verbose);
    let result = detector.detect(&img, floor, container_width, container_height)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n=== Room Detection Results ===");
    println!("Orientation: {:?}", result.orientation);
    println!("Total rooms detected: {}", result.rooms.len());
    println!("Aggregate confidence: {:.2}", result.confidence_score);

    if result.rooms.is_empty() {
        println!("No rooms detected.");
    } else {
        println!("\nDetected rooms:");
        for room in &result.rooms {
            println!(
                "  {} ({}) at ({}, {}) {}x{} - confidence: {:.2}",
                room.name,
                room.room_type.as_str(),
                room.x,
                room.y,
                room.width,
                room.height,
                room.confidence
            );
        }
    }

    Ok(())
}
