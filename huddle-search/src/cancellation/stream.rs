//! One live cancellation token per logical search stream.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::CancelToken;

/// A logical stream of searches where only the newest request may win.
///
/// [`RequestStream::begin`] cancels whatever request was in flight and
/// installs a fresh token for the new one; last writer wins.
pub struct RequestStream {
    label: String,
    current: Mutex<Option<Arc<CancelToken>>>,
}

impl RequestStream {
    /// Creates a stream. The label only shows up in logs.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            current: Mutex::new(None),
        }
    }

    /// Supersedes the in-flight request and returns the new token.
    #[must_use]
    pub fn begin(&self) -> Arc<CancelToken> {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            debug!(stream = %self.label, "superseding in-flight request");
            previous.cancel();
        }
        let token = Arc::new(CancelToken::new());
        *current = Some(token.clone());
        token
    }

    /// Cancels the in-flight request, if any, without starting a new one.
    pub fn cancel_current(&self) {
        if let Some(token) = self.current.lock().take() {
            debug!(stream = %self.label, "cancelling in-flight request");
            token.cancel();
        }
    }

    /// Whether a request issued on this stream is still live.
    #[must_use]
    pub fn has_live_request(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}

impl std::fmt::Debug for RequestStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestStream")
            .field("label", &self.label)
            .field("live", &self.has_live_request())
            .finish()
    }
}
