//! Garment image loading from files, URLs and in-memory bytes
//!
//! Catalog photos arrive as remote URLs, picked photos as local paths and
//! uploads as raw bytes. All three are resolved to raw bytes first and then
//! decoded with the `image` crate on a blocking thread.
//!
//! ## Supported Formats
//!
//! JPEG, PNG and WebP. Other extensions are still attempted through content
//! sniffing, since CDN URLs often carry no extension at all.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use tracing::debug;

use crate::error::{EngineError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    /// Detect format from a file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from the path component of a URL, ignoring query strings
    pub fn from_url(url: &str) -> Option<ImageFormat> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        Self::from_extension(Path::new(path))
    }

    fn decoder_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Where a garment image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
    /// Already-downloaded bytes, identified by a caller-chosen key
    Bytes { key: String, data: Arc<[u8]> },
}

impl ImageSource {
    /// Interpret a stored image reference: `http(s)://` is a URL, anything
    /// else a local path.
    pub fn from_reference(reference: &str) -> Self {
        let trimmed = reference.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }

    pub fn from_bytes(key: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        ImageSource::Bytes {
            key: key.into(),
            data: data.into(),
        }
    }

    /// Cache key for this image.
    pub fn key(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Url(url) => url.clone(),
            ImageSource::Bytes { key, .. } => key.clone(),
        }
    }

    fn format_hint(&self) -> Option<ImageFormat> {
        match self {
            ImageSource::Path(path) => ImageFormat::from_extension(path),
            ImageSource::Url(url) => ImageFormat::from_url(url),
            ImageSource::Bytes { .. } => None,
        }
    }
}

/// Read the raw bytes behind a source.
///
/// # Errors
///
/// `ImageLoadError` for unreadable files, `ImageFetchError` for failed or
/// non-success HTTP responses.
pub async fn fetch_bytes(source: &ImageSource, client: &reqwest::Client) -> Result<Arc<[u8]>> {
    match source {
        ImageSource::Path(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                EngineError::image_load(format!("Failed to read image file: {}", path.display()), e)
            })?;
            Ok(bytes.into())
        }
        ImageSource::Url(url) => {
            let response = client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| EngineError::image_fetch(url, "request failed", e))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| EngineError::image_fetch(url, "body could not be read", e))?;
            debug!(url = %url, bytes = bytes.len(), "fetched garment image");
            Ok(bytes.to_vec().into())
        }
        ImageSource::Bytes { data, .. } => Ok(Arc::clone(data)),
    }
}

/// Decode image bytes, trusting the format hint first and sniffing otherwise.
pub fn decode(bytes: &[u8], hint: Option<ImageFormat>) -> Result<DynamicImage> {
    let hinted = hint.and_then(|format| {
        image::load_from_memory_with_format(bytes, format.decoder_format())
            .map_err(|e| debug!(?format, error = %e, "format hint did not decode, sniffing"))
            .ok()
    });
    let img = match hinted {
        Some(img) => img,
        None => image::load_from_memory(bytes).map_err(|e| EngineError::image_load("Failed to decode image", e))?,
    };
    ensure_not_empty(img)
}

fn ensure_not_empty(img: DynamicImage) -> Result<DynamicImage> {
    if img.width() == 0 || img.height() == 0 {
        return Err(EngineError::EmptyImage {
            reason: "zero-sized image".to_string(),
        });
    }
    Ok(img)
}

/// Fetch and decode a garment image. Decoding runs on the blocking pool.
pub async fn load_image(source: &ImageSource, client: &reqwest::Client) -> Result<DynamicImage> {
    let bytes = fetch_bytes(source, client).await?;
    let hint = source.format_hint();
    tokio::task::spawn_blocking(move || decode(&bytes, hint))
        .await
        .map_err(|e| EngineError::image_load("Decode task failed", e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb(color));
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("photo.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("photo.webp")),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("photo.xyz")), None);
        assert_eq!(
            ImageFormat::from_url("https://cdn.example.com/a/shirt.png?w=400#top"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_url("https://cdn.example.com/img/123"), None);
    }

    #[test]
    fn test_source_from_reference() {
        assert_eq!(
            ImageSource::from_reference(" https://cdn.example.com/x.jpg "),
            ImageSource::Url("https://cdn.example.com/x.jpg".to_string())
        );
        assert_eq!(
            ImageSource::from_reference("/tmp/x.jpg"),
            ImageSource::Path(PathBuf::from("/tmp/x.jpg"))
        );
        assert_eq!(ImageSource::from_bytes("upload-1", vec![1u8]).key(), "upload-1");
    }

    #[test]
    fn test_decode_sniffs_when_hint_is_wrong() {
        let bytes = png_bytes([10, 20, 30]);
        let img = decode(&bytes, Some(ImageFormat::Jpeg)).unwrap();
        assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [10, 20, 30]);
        assert!(decode(b"not an image", None).is_err());
    }

    #[test]
    fn test_zero_sized_image_is_empty() {
        assert!(matches!(
            ensure_not_empty(DynamicImage::new_rgba8(0, 0)),
            Err(EngineError::EmptyImage { .. })
        ));
        assert!(matches!(
            ensure_not_empty(DynamicImage::new_rgba8(3, 0)),
            Err(EngineError::EmptyImage { .. })
        ));

        let bytes = png_bytes([1, 2, 3]);
        let img = decode(&bytes, Some(ImageFormat::Png)).unwrap();
        assert_eq!((img.width(), img.height()), (4, 4));
    }

    #[tokio::test]
    async fn test_load_from_file_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        std::fs::write(&path, png_bytes([200, 0, 0])).unwrap();
        let client = reqwest::Client::new();

        let img = load_image(&ImageSource::Path(path), &client).await.unwrap();
        assert_eq!(img.width(), 4);

        let source = ImageSource::from_bytes("mem", png_bytes([0, 0, 200]));
        let img = load_image(&source, &client).await.unwrap();
        assert_eq!(img.to_rgb8().get_pixel(3, 3).0, [0, 0, 200]);

        let missing = ImageSource::Path(dir.path().join("nope.png"));
        assert!(matches!(
            load_image(&missing, &client).await,
            Err(EngineError::ImageLoadError { .. })
        ));
    }
}
