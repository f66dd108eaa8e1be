//! Integration tests for the image loader and the async detect entry point.
//!
//! Tests cover:
//! - Loading from a file path and from raw bytes
//! - Source-reference parsing (URL vs path)
//! - Rejection of empty sources and zero-sized viewports
//! - End-to-end detection from a saved plan file

mod common;

use common::*;
use planscan::{DetectError, ImageSource, LoadError};

#[tokio::test]
async fn test_load_from_path() -> anyhow::Result<()> {
    // 1. Save a plan to disk
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("plan.png");
    simple_plan().save(&path)?;

    // 2. Load it back through the loader
    let img = planscan::loader::load(ImageSource::Path(path)).await?;
    assert_eq!((img.width(), img.height()), (400, 300));

    Ok(())
}

#[tokio::test]
async fn test_load_from_bytes() -> anyhow::Result<()> {
    let bytes = png_bytes(&simple_plan());
    let img = planscan::loader::load(ImageSource::Bytes(bytes)).await?;
    assert_eq!((img.width(), img.height()), (400, 300));

    Ok(())
}

#[tokio::test]
async fn test_load_rejects_empty_sources() {
    let err = planscan::loader::load(ImageSource::Bytes(Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::EmptySource));

    let err = planscan::loader::load(ImageSource::Url(String::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::EmptySource));
}

#[tokio::test]
async fn test_load_rejects_missing_file() {
    let err = planscan::loader::load(ImageSource::from("no/such/plan.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Read(_)));
}

#[tokio::test]
async fn test_load_rejects_undecodable_bytes() {
    let err = planscan::loader::load(ImageSource::Bytes(vec![0u8; 64]))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Decode(_)));
}

#[test]
fn test_source_reference_parsing() {
    assert!(matches!(
        ImageSource::from("https://example.com/plan.png"),
        ImageSource::Url(_)
    ));
    assert!(matches!(
        ImageSource::from("http://example.com/plan.png"),
        ImageSource::Url(_)
    ));
    assert!(matches!(
        ImageSource::from("plans/ground.png"),
        ImageSource::Path(_)
    ));

    let source = ImageSource::from("plans/ground.png");
    assert_eq!(source.location(), Some("plans/ground.png"));
}

#[tokio::test]
async fn test_detect_rejects_zero_viewport() {
    let err = planscan::detect(simple_plan(), 0, 100).await.unwrap_err();
    assert!(matches!(err, DetectError::EmptyViewport));

    let err = planscan::detect(simple_plan(), 100, 0).await.unwrap_err();
    assert!(matches!(err, DetectError::EmptyViewport));
}

#[tokio::test]
async fn test_detect_end_to_end_from_file() -> anyhow::Result<()> {
    // 1. Save a plan whose filename carries the floor key
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("ground_floor.png");
    simple_plan().save(&path)?;

    // 2. Detect straight from the path string
    let path_str = path.to_str().unwrap();
    let result = planscan::detect(path_str, 400, 300).await?;

    // 3. Floor key flows from the path into names and ids
    assert_eq!(result.rooms.len(), 2);
    assert!(result.rooms.iter().all(|r| r.id.starts_with("room-ground-")));
    let names: Vec<&str> = result.rooms.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"Lobby"));

    Ok(())
}

#[tokio::test]
async fn test_detect_from_in_memory_image() -> anyhow::Result<()> {
    // In-memory sources have no path, so the floor key falls back to "plan"
    let result = planscan::detect(simple_plan(), 800, 600).await?;

    assert_eq!(result.rooms.len(), 2);
    assert!(result.rooms.iter().all(|r| r.id.starts_with("room-plan-")));

    Ok(())
}
