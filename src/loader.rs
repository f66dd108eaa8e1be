use std::path::PathBuf;
use std::time::Duration;

use image::DynamicImage;
use thiserror::Error;

/// How long a source may take to fetch before the load is abandoned.
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Where a floor plan comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
    Bytes(Vec<u8>),
    Image(DynamicImage),
}

impl ImageSource {
    /// The path or URL string, if this source has one. Used to pick the
    /// floor name list; in-memory sources have no location.
    pub fn location(&self) -> Option<&str> {
        match self {
            ImageSource::Path(p) => p.to_str(),
            ImageSource::Url(u) => Some(u.as_str()),
            ImageSource::Bytes(_) | ImageSource::Image(_) => None,
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            ImageSource::Url(s.to_string())
        } else {
            ImageSource::Path(PathBuf::from(s))
        }
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Image(img)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Custom error types for image loading
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image source is empty")]
    EmptySource,

    #[error("timed out after {0:?} while loading image")]
    Timeout(Duration),

    #[error("failed to fetch image: {0}")]
    Fetch(String),

    #[error("failed to read image file: {0}")]
    Read(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image has zero width or height")]
    ZeroSized,
}

/// Fetch and decode a floor plan image.
///
/// URL fetches get a `cb=<millis>` query parameter appended so a viewer that
/// cached an earlier failed fetch of the same URL is never served that
/// failure again. All I/O is bounded by [`LOAD_TIMEOUT`].
pub async fn load(source: ImageSource) -> Result<DynamicImage, LoadError> {
    let img = match source {
        ImageSource::Path(path) => {
            if path.as_os_str().is_empty() {
                return Err(LoadError::EmptySource);
            }
            let bytes = tokio::time::timeout(LOAD_TIMEOUT, tokio::fs::read(&path))
                .await
                .map_err(|_| LoadError::Timeout(LOAD_TIMEOUT))?
                .map_err(|e| LoadError::Read(e.to_string()))?;
            decode(&bytes)?
        }
        ImageSource::Url(url) => {
            if url.is_empty() {
                return Err(LoadError::EmptySource);
            }
            let bytes = tokio::time::timeout(LOAD_TIMEOUT, fetch(&cache_busted(&url)))
                .await
                .map_err(|_| LoadError::Timeout(LOAD_TIMEOUT))??;
            decode(&bytes)?
        }
        ImageSource::Bytes(bytes) => {
            if bytes.is_empty() {
                return Err(LoadError::EmptySource);
            }
            decode(&bytes)?
        }
        ImageSource::Image(img) => img,
    };

    if img.width() == 0 || img.height() == 0 {
        return Err(LoadError::ZeroSized);
    }
    Ok(img)
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    image::load_from_memory(bytes).map_err(|e| LoadError::Decode(e.to_string()))
}

async fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(LoadError::Fetch(format!("HTTP {}", response.status())));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

fn cache_busted(url: &str) -> String {
    let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}cb={millis}")
}
