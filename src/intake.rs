//! Image intake: decode an upload, normalize its color mode, re-encode as JPEG

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::guidance::ImagePayload;
use crate::{Error, Result};

/// MIME type of every normalized payload
pub const NORMALIZED_MIME_TYPE: &str = "image/jpeg";

/// Decode an uploaded image and re-encode it as JPEG
///
/// 8-bit grayscale and 8-bit RGB images keep their color mode; everything
/// else (alpha channels, 16-bit depths, palettes) is flattened to 8-bit RGB.
///
/// # Errors
///
/// Returns `Error::Image` if the bytes are not a decodable image
pub fn normalize_image(bytes: &[u8]) -> Result<ImagePayload> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| Error::Image(format!("Invalid image: {e}")))?;

    let (width, height) = (decoded.width(), decoded.height());
    let original = decoded.color();
    let normalized = normalize_color(decoded);

    let mut data = Vec::new();
    normalized
        .write_to(&mut Cursor::new(&mut data), ImageFormat::Jpeg)
        .map_err(|e| Error::Image(format!("JPEG encoding failed: {e}")))?;

    tracing::debug!(
        width,
        height,
        color = ?original,
        bytes = data.len(),
        "normalized upload"
    );

    Ok(ImagePayload {
        mime_type: NORMALIZED_MIME_TYPE,
        data,
    })
}

/// Run [`normalize_image`] on the blocking pool
///
/// # Errors
///
/// Returns `Error::Image` if decoding fails or the worker task panics
pub async fn normalize_upload(bytes: Vec<u8>) -> Result<ImagePayload> {
    tokio::task::spawn_blocking(move || normalize_image(&bytes))
        .await
        .map_err(|e| Error::Image(format!("image worker failed: {e}")))?
}

fn normalize_color(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
