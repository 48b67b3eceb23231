use std::fmt;

use crate::error::ConvertError;

/// JPEG quality as a fraction in `[0, 1]`.
///
/// Values outside the range (and NaN or infinities) are rejected rather than
/// clamped, so a typo in a job file surfaces as an error instead of a silently
/// different output.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f32);

impl Quality {
    /// Quality used when the caller does not specify one.
    pub const DEFAULT: Quality = Quality(0.9);

    pub fn new(value: f32) -> crate::error::Result<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ConvertError::encode(format!(
                "JPEG quality must be within 0.0-1.0, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Map to the encoder's 1-100 integer scale. 0.0 maps to 1.
    pub fn to_jpeg_scale(self) -> u8 {
        ((self.0 * 100.0).round() as u8).clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Quality {
    type Error = ConvertError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
