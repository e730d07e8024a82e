//! Cancellation signal that disposable handles can be linked to.
//!
//! Signalling a [`CancellationToken`] fires its registered callbacks; the
//! [`DisposeWith::dispose_when_cancelled`](crate::ext::DisposeWith::dispose_when_cancelled)
//! helper uses this to release a handle when an external signal fires.

mod token;

pub use token::CancellationToken;
