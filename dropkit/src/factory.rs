//! A disposable that creates and owns other disposables.

use tracing::trace;

use crate::disposable::{CompositeDisposable, Disposable, SerialSlot};
use crate::errors::DisposeError;

/// An owner for disposables created over its lifetime.
///
/// Handles added to the factory, and every serial slot it creates, are
/// released together when the factory is disposed: exactly once, in
/// registration order. The factory is clonable; clones share the same
/// owned set.
#[derive(Clone, Default, Debug)]
pub struct DisposableFactory {
    owned: CompositeDisposable,
}

impl DisposableFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle for release when the factory is disposed.
    pub fn add<D: Disposable + 'static>(&self, disposable: D) {
        self.owned.add(disposable);
    }

    /// Creates a new serial slot owned by this factory.
    ///
    /// The slot, and whatever it holds at the time, is released when the
    /// factory is disposed.
    #[must_use]
    pub fn create_serial(&self) -> SerialSlot {
        let slot = SerialSlot::new();
        trace!("factory created serial slot");
        self.owned.add(slot.clone());
        slot
    }

    /// Creates a new owned serial slot, reporting when the factory is
    /// terminal.
    ///
    /// On `Err` the returned slot would have been unowned; it is disposed
    /// and not returned.
    pub fn try_create_serial(&self) -> Result<SerialSlot, DisposeError> {
        let slot = SerialSlot::new();
        self.owned.try_add(slot.clone())?;
        Ok(slot)
    }

    /// Returns the number of handles the factory currently owns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    /// Returns whether the factory owns no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}

impl Disposable for DisposableFactory {
    fn dispose(&self) {
        self.owned.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.owned.is_disposed()
    }
}
