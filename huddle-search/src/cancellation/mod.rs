//! Cooperative cancellation for in-flight search requests.
//!
//! Searches are serialized logically, not by locking: each logical stream
//! (explicit submits, dropdown previews) keeps exactly one live
//! [`CancelToken`], and beginning a new request first cancels the previous
//! one. A cancelled request's settlement is suppressed rather than surfaced.

mod stream;
mod token;

pub use stream::RequestStream;
pub use token::CancelToken;
