pub mod jpeg;
pub mod png;
pub mod quality;

pub use png::DecodeLimits;
pub use quality::Quality;

use image::{RgbImage, RgbaImage};

use crate::error::ConvertError;

/// Decoded pixel grid, 8-bit RGBA, never zero-sized.
#[derive(Debug, Clone)]
pub struct RawImage {
    pixels: RgbaImage,
}

impl RawImage {
    pub fn new(pixels: RgbaImage) -> crate::error::Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ConvertError::decode(format!(
                "Image has no pixels ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Build from raw RGBA bytes (4 bytes per pixel, row-major).
    pub fn from_rgba(width: u32, height: u32, rgba_data: Vec<u8>) -> crate::error::Result<Self> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|wh| wh.checked_mul(4))
            .ok_or_else(|| {
                ConvertError::decode(format!(
                    "Overflow computing buffer size for {width}x{height} RGBA image"
                ))
            })?;

        if rgba_data.len() != expected_len {
            return Err(ConvertError::decode(format!(
                "RGBA data size mismatch: expected {} bytes, got {}",
                expected_len,
                rgba_data.len()
            )));
        }

        let pixels = RgbaImage::from_raw(width, height, rgba_data)
            .ok_or_else(|| ConvertError::decode("Failed to create image from RGBA data"))?;
        Self::new(pixels)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decode/encode capability the converter is built on.
///
/// Implementations must be stateless with respect to individual calls so a
/// single codec can serve concurrent conversions.
pub trait Codec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> crate::error::Result<RawImage>;

    fn encode(&self, canvas: &RgbImage, quality: Quality) -> crate::error::Result<Vec<u8>>;
}

/// [`Codec`] backed by the `image` crate's PNG decoder and JPEG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec {
    limits: DecodeLimits,
}

impl ImageRsCodec {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }
}

impl Codec for ImageRsCodec {
    fn decode(&self, bytes: &[u8]) -> crate::error::Result<RawImage> {
        png::decode_png(bytes, &self.limits)
    }

    fn encode(&self, canvas: &RgbImage, quality: Quality) -> crate::error::Result<Vec<u8>> {
        jpeg::encode_rgb_to_jpeg(canvas, quality)
    }
}
