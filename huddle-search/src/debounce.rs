//! Cancellable delayed task scheduling.
//!
//! The debounce timer is an effectful concern, so it lives behind this
//! small scheduler instead of being tangled into caching or scoring logic.
//! Each [`Debouncer::schedule`] call supersedes the previous one: only the
//! task alive when the delay elapses actually runs.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Trailing-edge debouncer over the tokio timer.
///
/// Scheduling bumps an epoch counter; the spawned task only runs its work
/// if the epoch is still current when the delay elapses.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    epoch: Arc<AtomicU64>,
}

impl Debouncer {
    /// Creates a debouncer with the given trailing delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `task` to run after the delay, superseding any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let scheduled_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let epoch = self.epoch.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if epoch.load(Ordering::SeqCst) == scheduled_epoch {
                task().await;
            }
        });
    }

    /// Invalidates any pending task without scheduling a new one.
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}
