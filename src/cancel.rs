//! Cooperative cancellation for long lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Error;

/// Shared flag a caller flips to abort a lookup. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    /// Set once cancellation is requested.
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        return self.cancelled.load(Ordering::SeqCst);
    }

    /// Checkpoint for loops over projects and libraries.
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` once cancellation has been requested.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        return Ok(());
    }
}
