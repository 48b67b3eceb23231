use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ConvertError;

/// Shared flag that stops conversions at their next checkpoint.
///
/// Clones observe the same flag. Checkpoints are before decode and before
/// encode; a conversion already inside the codec runs that step to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return [`ConvertError::Cancelled`] if cancellation was requested.
    pub fn checkpoint(&self) -> crate::error::Result<()> {
        if self.is_cancelled() {
            Err(ConvertError::Cancelled)
        } else {
            Ok(())
        }
    }
}
