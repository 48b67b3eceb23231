// Input files as selected by the user: bytes + declared type

use std::path::Path;

use image::ImageFormat;

use crate::error::ConvertError;

/// MIME type accepted by the converter.
pub const PNG_MIME: &str = "image/png";

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Immutable input image with its declared MIME type.
///
/// The declared type is what the user-facing layer filters on. It is not a
/// guarantee that the bytes decode; a mislabelled file still fails in the
/// decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file and declare its type from the extension, falling back to
    /// the magic bytes when the extension says nothing.
    pub fn from_path(path: &Path) -> crate::error::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime_type = declared_mime_type(path, &bytes);
        Ok(Self::new(path.display().to_string(), mime_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the encoded source in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_png(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case(PNG_MIME)
    }

    /// Reject anything not declared as PNG before it reaches the converter.
    pub fn ensure_png(&self) -> crate::error::Result<()> {
        if self.is_png() {
            Ok(())
        } else {
            Err(ConvertError::unsupported_type(format!(
                "{} is {}, expected {}",
                self.name, self.mime_type, PNG_MIME
            )))
        }
    }
}

/// MIME type for a file, by extension first and content second.
pub fn declared_mime_type(path: &Path, bytes: &[u8]) -> String {
    if path.extension().is_some() {
        return ImageFormat::from_path(path)
            .map(|f| f.to_mime_type())
            .unwrap_or(UNKNOWN_MIME)
            .to_string();
    }

    image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
        .to_string()
}
