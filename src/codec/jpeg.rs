// Opaque RGB canvas -> JPEG bytes

use std::io::Cursor;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use super::Quality;
use crate::error::ConvertError;

/// Encode an opaque RGB canvas to JPEG bytes.
///
/// The output always has three color channels; there is no alpha to carry.
pub fn encode_rgb_to_jpeg(rgb: &RgbImage, quality: Quality) -> crate::error::Result<Vec<u8>> {
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(ConvertError::encode(format!(
            "Cannot encode empty {}x{} canvas",
            rgb.width(),
            rgb.height()
        )));
    }

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.to_jpeg_scale());
    rgb.write_with_encoder(encoder)
        .map_err(|e| ConvertError::encode(format!("JPEG encoder failed: {e}")))?;

    let bytes = buf.into_inner();
    if bytes.is_empty() {
        return Err(ConvertError::encode("JPEG encoder produced no output"));
    }
    Ok(bytes)
}
