//! Core disposable abstraction and owned handle types.
//!
//! This module provides:
//! - The [`Disposable`] trait for idempotent resource release
//! - [`DisposeGuard`] for closure-backed leaf handles
//! - [`CompositeDisposable`] for ordered group release
//! - [`SerialSlot`] for replace-then-release single slots

mod composite;
mod guard;
mod serial;

pub use composite::CompositeDisposable;
pub use guard::DisposeGuard;
pub use serial::SerialSlot;

use std::sync::Arc;

/// A handle owning a resource with a single idempotent release operation.
///
/// `dispose` releases the underlying resource. The first call releases;
/// every later call is a no-op. Implementations use interior mutability so
/// a shared handle can be disposed from any holder.
pub trait Disposable: Send + Sync {
    /// Releases the underlying resource. Idempotent.
    fn dispose(&self);

    /// Returns whether the handle has already been disposed.
    fn is_disposed(&self) -> bool;
}

/// A boxed, type-erased disposable handle.
pub type BoxDisposable = Box<dyn Disposable>;

impl<T: Disposable + ?Sized> Disposable for Box<T> {
    fn dispose(&self) {
        (**self).dispose();
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

impl<T: Disposable + ?Sized> Disposable for Arc<T> {
    fn dispose(&self) {
        (**self).dispose();
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}
