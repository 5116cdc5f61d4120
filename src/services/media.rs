//! Hero image intake
//!
//! Uploads are sniffed before anything is stored: the declared content type
//! must be `image/*` and the magic bytes must identify PNG, JPEG or WebP.
//! Decoding happens later, inside the generation pipeline.

use crate::error::StudioError;
use image::{DynamicImage, ImageFormat};

pub const ACCEPTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// Validate an upload and return its detected format
pub fn sniff_image(bytes: &[u8], declared_type: Option<&str>) -> Result<ImageFormat, StudioError> {
    if let Some(declared) = declared_type {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        if !essence.to_ascii_lowercase().starts_with("image/") {
            return Err(StudioError::UnsupportedMedia(format!(
                "declared content type {essence:?} is not an image"
            )));
        }
    }

    let format = image::guess_format(bytes)
        .map_err(|_| StudioError::UnsupportedMedia("unrecognized image data".to_string()))?;

    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(StudioError::UnsupportedMedia(format!(
            "{} images are not supported",
            format.extensions_str().first().copied().unwrap_or("these")
        )));
    }
    Ok(format)
}

/// Decode image bytes of a previously sniffed format
pub fn decode_image(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, StudioError> {
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| StudioError::DecodeFailure(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(StudioError::DecodeFailure("image has no pixels".to_string()));
    }
    Ok(image)
}
