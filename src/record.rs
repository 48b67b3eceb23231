// Per-item conversion state for batch front ends

use crate::convert::ConvertedImage;
use crate::error::ConvertError;
use crate::report::SizeReport;
use crate::source::SourceImage;

/// Where one item is in its conversion.
///
/// The output only exists in `Completed`, and `Error` never carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionStatus {
    Idle,
    Converting,
    Completed(ConvertedImage),
    Error(String),
}

impl ConversionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConversionStatus::Idle => "idle",
            ConversionStatus::Converting => "converting",
            ConversionStatus::Completed(_) => "completed",
            ConversionStatus::Error(_) => "error",
        }
    }
}

/// A source image together with its conversion status.
#[derive(Debug, Clone)]
pub struct ConversionRecord {
    id: usize,
    source: SourceImage,
    status: ConversionStatus,
}

impl ConversionRecord {
    pub fn new(id: usize, source: SourceImage) -> Self {
        Self {
            id,
            source,
            status: ConversionStatus::Idle,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn status(&self) -> &ConversionStatus {
        &self.status
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.status, ConversionStatus::Idle)
    }

    pub fn converted(&self) -> Option<&ConvertedImage> {
        match &self.status {
            ConversionStatus::Completed(image) => Some(image),
            _ => None,
        }
    }

    /// Move from `Idle` to `Converting`. Returns false for any other state.
    pub fn start(&mut self) -> bool {
        if self.is_idle() {
            self.status = ConversionStatus::Converting;
            true
        } else {
            false
        }
    }

    /// Record the outcome of a conversion. Failures are terminal.
    pub fn finish(&mut self, result: crate::error::Result<ConvertedImage>) {
        self.status = match result {
            Ok(image) => ConversionStatus::Completed(image),
            Err(e) => ConversionStatus::Error(e.to_string()),
        };
    }

    /// Mark as failed without having converted, e.g. for a rejected type.
    pub fn fail(&mut self, error: &ConvertError) {
        self.status = ConversionStatus::Error(error.to_string());
    }

    pub fn size_report(&self) -> Option<SizeReport> {
        self.converted()
            .map(|image| SizeReport::new(self.source.len() as u64, image.len() as u64))
    }
}
