//! Error types for dropkit operations.
//!
//! Normal operation never errors: double-dispose is a silent no-op by
//! contract. The only reportable condition is registration against a
//! container that has already reached its terminal state.

use thiserror::Error;

/// Errors from the rejecting registration variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisposeError {
    /// The target container was already disposed. The handle offered for
    /// registration has been released rather than stored.
    #[error("container already disposed; incoming handle was released instead of registered")]
    Terminated,
}
