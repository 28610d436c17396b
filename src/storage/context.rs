//! Cancellation context threaded through every storage operation.

use crate::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cancellation flag plus optional deadline.
///
/// Clones share the flag, so cancelling any clone cancels them all. Engines
/// call [`OpContext::check`] before opening a transaction, between
/// statements, while scanning rows, and before committing; a fired context
/// aborts the open transaction.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use statusboard::storage::OpContext;
///
/// let ctx = OpContext::with_timeout(Duration::from_secs(2));
/// let handle = ctx.clone();
/// std::thread::spawn(move || handle.cancel());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context that never expires on its own.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the context was cancelled or its deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] or [`Error::DeadlineExceeded`].
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled {
                operation: operation.to_string(),
            });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Error::DeadlineExceeded {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_background_never_fires() {
        let ctx = OpContext::background();
        assert!(ctx.check("get_item").is_ok());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_shared_across_clones() {
        let ctx = OpContext::background();
        let clone = ctx.clone();
        clone.cancel();
        let err = ctx.check("store_item").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_deadline_exceeded() {
        let ctx = OpContext::with_deadline(Instant::now());
        let err = ctx.check("find_items").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
    }
}
