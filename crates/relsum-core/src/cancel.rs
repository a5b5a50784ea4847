//! Cooperative cancellation for long-running scans.
//!
//! A shared atomic flag checked at bounded intervals (between containers
//! and every [`crate::database::CANCEL_CHECK_INTERVAL`] pages, never
//! mid-fingerprint). A fingerprint computation, once started, always
//! completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use relsum_error::{ChecksumError, Result};

/// Handle for requesting and observing cancellation of a scan.
///
/// Clones share the same flag; hand one clone to the scan and keep another
/// to cancel from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Checkpoint: return `Err(Cancelled)` if cancellation was requested.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ChecksumError::Cancelled)
        } else {
            Ok(())
        }
    }
}
