pub mod cancel;
pub mod compositor;

pub use cancel::CancellationToken;

use tracing::debug;

use crate::codec::{Codec, DecodeLimits, ImageRsCodec, Quality};

/// JPEG output of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ConvertedImage {
    pub(crate) fn from_parts(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size of the JPEG in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Decode -> flatten onto white -> encode, over a [`Codec`].
///
/// Holds no per-conversion state: every call allocates its own canvas, so a
/// shared `Converter` can be used from many threads at once.
#[derive(Debug, Clone, Default)]
pub struct Converter<C = ImageRsCodec> {
    codec: C,
}

impl Converter<ImageRsCodec> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self::with_codec(ImageRsCodec::new(limits))
    }
}

impl<C: Codec> Converter<C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn convert(&self, png_bytes: &[u8], quality: Quality) -> crate::error::Result<ConvertedImage> {
        self.convert_with_cancel(png_bytes, quality, &CancellationToken::new())
    }

    /// Convert, stopping with [`crate::error::ConvertError::Cancelled`] if
    /// `token` is cancelled before decode or before encode.
    pub fn convert_with_cancel(
        &self,
        png_bytes: &[u8],
        quality: Quality,
        token: &CancellationToken,
    ) -> crate::error::Result<ConvertedImage> {
        token.checkpoint()?;
        let raw = self.codec.decode(png_bytes)?;
        let (width, height) = (raw.width(), raw.height());

        let canvas = compositor::flatten_onto_white(&raw);
        drop(raw);
        debug!(width, height, "flattened onto white background");

        token.checkpoint()?;
        let bytes = self.codec.encode(&canvas, quality)?;
        debug!(
            input_bytes = png_bytes.len(),
            output_bytes = bytes.len(),
            %quality,
            "encoded JPEG"
        );

        Ok(ConvertedImage::from_parts(bytes, width, height))
    }
}

/// Convert PNG bytes to JPEG with the default codec.
///
/// `quality` must be within `[0, 1]` (see [`Quality::new`]); it is checked
/// before any decoding happens.
pub fn convert(png_bytes: &[u8], quality: f32) -> crate::error::Result<ConvertedImage> {
    let quality = Quality::new(quality)?;
    Converter::new().convert(png_bytes, quality)
}
