// Human-readable byte sizes for before/after reporting

use std::fmt;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const STEP: f64 = 1024.0;

/// Format a byte count in base-1024 units with at most `decimals` decimals.
///
/// Trailing zeros are dropped: `1536` is `"1.5 KB"`, `2048` is `"2 KB"`.
/// Values beyond the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    let fixed = format!("{value:.decimals$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    format!("{trimmed} {}", UNITS[unit])
}

/// Source and output sizes of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub original: u64,
    pub converted: u64,
}

impl SizeReport {
    pub fn new(original: u64, converted: u64) -> Self {
        Self {
            original,
            converted,
        }
    }

    /// Output size as a fraction of the input size. `None` for an empty input.
    pub fn ratio(&self) -> Option<f64> {
        (self.original > 0).then(|| self.converted as f64 / self.original as f64)
    }

    /// Signed change in percent, negative when the output shrank.
    pub fn change_percent(&self) -> Option<f64> {
        self.ratio().map(|r| (r - 1.0) * 100.0)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            format_bytes(self.original, 2),
            format_bytes(self.converted, 2)
        )?;
        if let Some(change) = self.change_percent() {
            write!(f, " ({change:+.1}%)")?;
        }
        Ok(())
    }
}
