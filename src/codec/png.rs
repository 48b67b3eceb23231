// PNG bytes -> RawImage, bounded by raster limits

use std::io::Cursor;

use image::{ImageReader, Limits};
use tracing::debug;

use super::RawImage;
use crate::error::ConvertError;

/// Largest width or height accepted by default.
pub const DEFAULT_MAX_DIMENSION: u32 = 16_384;

/// Largest decoder allocation accepted by default (1 GiB).
pub const DEFAULT_MAX_ALLOC: u64 = 1024 * 1024 * 1024;

/// Raster limits applied before and during decoding.
///
/// An image over any limit fails with a decode error instead of being
/// truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub max_alloc: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            max_alloc: DEFAULT_MAX_ALLOC,
        }
    }
}

impl DecodeLimits {
    /// Square limit of `max_dimension` on both axes with the default allocation cap.
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_width: max_dimension,
            max_height: max_dimension,
            ..Self::default()
        }
    }

    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

/// Decode encoded image bytes into an RGBA raster.
///
/// Named for the input it is meant for, but not restricted to it: any format
/// the `image` crate can sniff from the magic bytes (JPEG, GIF, BMP, ...)
/// decodes too. Callers that must accept PNG only gate on
/// [`crate::source::SourceImage::ensure_png`] first. Empty input, unknown formats,
/// corrupt data, zero-sized images and images over `limits` all fail with
/// [`ConvertError::DecodeError`].
pub fn decode_png(bytes: &[u8], limits: &DecodeLimits) -> crate::error::Result<RawImage> {
    if bytes.is_empty() {
        return Err(ConvertError::decode("Input is empty"));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConvertError::decode(format!("Failed to read image header: {e}")))?;

    let format = reader
        .format()
        .ok_or_else(|| ConvertError::decode("Unrecognized image format"))?;

    reader.limits(limits.to_image_limits());

    let decoded = reader
        .decode()
        .map_err(|e| ConvertError::decode(format!("Failed to decode {format:?} image: {e}")))?;

    debug!(
        ?format,
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "decoded source image"
    );

    RawImage::new(decoded.into_rgba8())
}
