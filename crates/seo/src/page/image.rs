//! Social image URLs.

use std::path::Path;

/// How a resized image fills the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    Crop,
    Fit,
}

impl ResizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeMode::Crop => "crop",
            ResizeMode::Fit => "fit",
        }
    }
}

/// Produces the URL of a resized derivative of an image.
pub trait ImageResizer: Send + Sync {
    fn resized_url(&self, image: &str, width: u32, height: u32, mode: ResizeMode) -> String;
}

/// Appends the dimensions as query parameters, for image servers that
/// resize on the fly.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringResizer;

impl ImageResizer for QueryStringResizer {
    fn resized_url(&self, image: &str, width: u32, height: u32, mode: ResizeMode) -> String {
        let separator = if image.contains('?') { '&' } else { '?' };
        format!(
            "{image}{separator}width={width}&height={height}&mode={}",
            mode.as_str()
        )
    }
}

/// Image MIME type by file extension.
pub fn mime_from_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}
