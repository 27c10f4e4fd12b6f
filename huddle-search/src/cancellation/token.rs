//! Cancellation token for a single request.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// A callback invoked when the token is cancelled.
pub type CancelCallback = Box<dyn Fn() + Send + Sync>;

/// A one-shot cooperative cancellation flag.
///
/// Cancellation is idempotent: callbacks run exactly once, on the first
/// `cancel` call. Registering a callback on an already-cancelled token
/// invokes it immediately.
#[derive(Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
    callbacks: RwLock<Vec<CancelCallback>>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation, invoking registered callbacks once.
    pub fn cancel(&self) {
        if self
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            for callback in self.callbacks.read().iter() {
                callback();
            }
        }
    }

    /// Registers a callback to run on cancellation.
    ///
    /// Runs immediately if the token is already cancelled.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_cancelled() {
            callback();
        } else {
            self.callbacks.write().push(Box::new(callback));
        }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_token_starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_sets_flag() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_callbacks_run_once() {
        let token = CancelToken::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        token.on_cancel(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        token.cancel();
        token.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_late_callback_runs_immediately() {
        let token = CancelToken::new();
        token.cancel();

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        token.on_cancel(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
