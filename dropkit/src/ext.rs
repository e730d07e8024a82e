//! Composition and scoped-registration helpers.
//!
//! These helpers let call sites combine handles into one composite handle
//! and register a handle with its release scope while keeping the handle
//! itself available for further chaining.

use crate::cancellation::CancellationToken;
use crate::disposable::{BoxDisposable, CompositeDisposable, Disposable};
use crate::factory::DisposableFactory;

/// Combines a sequence of handles into one composite handle.
///
/// Disposing the result disposes every member exactly once, in iteration
/// order.
pub fn to_composite<I, D>(disposables: I) -> CompositeDisposable
where
    I: IntoIterator<Item = D>,
    D: Disposable + 'static,
{
    disposables.into_iter().collect()
}

/// Combines two handles into one composite handle, released in order.
pub fn chain<A, B>(first: A, second: B) -> CompositeDisposable
where
    A: Disposable + 'static,
    B: Disposable + 'static,
{
    let container = CompositeDisposable::new();
    container.add(first);
    container.add(second);
    container
}

/// Disposes every handle in a sequence, in iteration order.
pub fn dispose_all<I, D>(disposables: I)
where
    I: IntoIterator<Item = D>,
    D: Disposable,
{
    for disposable in disposables {
        disposable.dispose();
    }
}

/// Registers every handle in a sequence with a composite container.
pub fn register_all<I, D>(disposables: I, container: &CompositeDisposable)
where
    I: IntoIterator<Item = D>,
    D: Disposable + 'static,
{
    container.add_all(disposables);
}

/// Chaining registration helpers for disposable handles.
///
/// Each method registers the handle with a release scope and returns the
/// original handle unchanged, so construction and registration read as one
/// expression:
///
/// ```rust,ignore
/// let timer = spawn_timer().dispose_with(&container);
/// ```
pub trait DisposeWith: Sized {
    /// Registers this handle for release when the container is disposed.
    #[must_use]
    fn dispose_with(self, container: &CompositeDisposable) -> Self;

    /// Registers this handle with a disposable factory.
    #[must_use]
    fn dispose_with_factory(self, factory: &DisposableFactory) -> Self;

    /// Hands this handle to an arbitrary registrar callback.
    #[must_use]
    fn dispose_via<F: FnOnce(BoxDisposable)>(self, register: F) -> Self;

    /// Releases this handle when the cancellation signal fires.
    ///
    /// If the token is already cancelled, the handle is released
    /// immediately.
    #[must_use]
    fn dispose_when_cancelled(self, token: &CancellationToken) -> Self;
}

impl<T> DisposeWith for T
where
    T: Disposable + Clone + 'static,
{
    fn dispose_with(self, container: &CompositeDisposable) -> Self {
        container.add(self.clone());
        self
    }

    fn dispose_with_factory(self, factory: &DisposableFactory) -> Self {
        factory.add(self.clone());
        self
    }

    fn dispose_via<F: FnOnce(BoxDisposable)>(self, register: F) -> Self {
        register(Box::new(self.clone()));
        self
    }

    fn dispose_when_cancelled(self, token: &CancellationToken) -> Self {
        let handle = self.clone();
        token.on_cancel(move || handle.dispose());
        self
    }
}

/// Registration helpers for optional handles.
///
/// `None` is a no-op pass-through, guarding call sites where resource
/// creation itself is conditional.
pub trait OptionDisposeExt: Sized {
    /// Registers the handle if present; `None` is a no-op.
    #[must_use]
    fn dispose_with(self, container: &CompositeDisposable) -> Self;

    /// Registers the handle with a factory if present; `None` is a no-op.
    #[must_use]
    fn dispose_with_factory(self, factory: &DisposableFactory) -> Self;

    /// Hands the handle to a registrar if present; `None` is a no-op.
    #[must_use]
    fn dispose_via<F: FnOnce(BoxDisposable)>(self, register: F) -> Self;

    /// Links the handle to a cancellation signal if present; `None` is a
    /// no-op.
    #[must_use]
    fn dispose_when_cancelled(self, token: &CancellationToken) -> Self;
}

impl<T> OptionDisposeExt for Option<T>
where
    T: Disposable + Clone + 'static,
{
    fn dispose_with(self, container: &CompositeDisposable) -> Self {
        self.map(|handle| handle.dispose_with(container))
    }

    fn dispose_with_factory(self, factory: &DisposableFactory) -> Self {
        self.map(|handle| handle.dispose_with_factory(factory))
    }

    fn dispose_via<F: FnOnce(BoxDisposable)>(self, register: F) -> Self {
        self.map(|handle| handle.dispose_via(register))
    }

    fn dispose_when_cancelled(self, token: &CancellationToken) -> Self {
        self.map(|handle| handle.dispose_when_cancelled(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposable::DisposeGuard;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_to_composite_releases_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let guards: Vec<DisposeGuard> = (0..3)
            .map(|id| {
                let order = order.clone();
                DisposeGuard::new(move || {
                    order.lock().push(id);
                })
            })
            .collect();

        let combined = to_composite(guards);
        combined.dispose();

        assert_eq!(order.lock().clone(), vec![0, 1, 2]);
    }

    #[test]
    fn test_chain_releases_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let order1 = order.clone();
        let first = DisposeGuard::new(move || {
            order1.lock().push("first");
        });
        let order2 = order.clone();
        let second = DisposeGuard::new(move || {
            order2.lock().push("second");
        });

        let combined = chain(first, second);
        combined.dispose();

        assert_eq!(order.lock().clone(), vec!["first", "second"]);
    }

    #[test]
    fn test_dispose_all() {
        let counter = Arc::new(AtomicUsize::new(0));

        let guards: Vec<DisposeGuard> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                DisposeGuard::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        dispose_all(guards);

        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_register_all() {
        let container = CompositeDisposable::new();
        let guards: Vec<DisposeGuard> = (0..3).map(|_| DisposeGuard::empty()).collect();

        register_all(guards, &container);

        assert_eq!(container.len(), 3);
    }

    #[test]
    fn test_dispose_with_returns_usable_handle() {
        let container = CompositeDisposable::new();

        let guard = DisposeGuard::empty().dispose_with(&container);

        assert!(!guard.is_disposed());
        assert_eq!(container.len(), 1);

        container.dispose();
        assert!(guard.is_disposed());
    }

    #[test]
    fn test_dispose_via_hands_handle_to_registrar() {
        let container = CompositeDisposable::new();

        let guard = DisposeGuard::empty().dispose_via(|handle| container.add(handle));

        container.dispose();
        assert!(guard.is_disposed());
    }

    #[test]
    fn test_dispose_when_cancelled() {
        let token = CancellationToken::new();
        let guard = DisposeGuard::empty().dispose_when_cancelled(&token);

        assert!(!guard.is_disposed());

        token.cancel("shutting down");
        assert!(guard.is_disposed());
    }

    #[test]
    fn test_dispose_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel("done");

        let guard = DisposeGuard::empty().dispose_when_cancelled(&token);
        assert!(guard.is_disposed());
    }

    #[test]
    fn test_none_registration_is_noop() {
        let container = CompositeDisposable::new();
        let token = CancellationToken::new();

        let absent: Option<DisposeGuard> = None;
        let absent = absent.dispose_with(&container);
        let absent = absent.dispose_when_cancelled(&token);
        let absent = absent.dispose_via(|handle| container.add(handle));

        assert!(absent.is_none());
        assert!(container.is_empty());
    }

    #[test]
    fn test_some_registration_registers() {
        let container = CompositeDisposable::new();

        let present = Some(DisposeGuard::empty()).dispose_with(&container);

        assert!(present.is_some());
        assert_eq!(container.len(), 1);
    }
}
