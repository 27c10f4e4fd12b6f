//! Clock abstraction so time-dependent behavior is deterministic in tests.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Cache TTLs, recency scoring, and session bookkeeping all read time
/// through this trait rather than calling `Utc::now()` directly.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
