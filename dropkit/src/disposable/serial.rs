//! Single mutable slot with replace-then-release semantics.

use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;
use tracing::trace;

use super::{BoxDisposable, Disposable};

/// A slot holding at most one disposable handle.
///
/// Installing a new occupant disposes the previous one before the new one
/// becomes current, so the slot never holds two live resources. Disposing
/// the slot disposes the occupant and makes the slot terminal; a handle
/// installed into a terminal slot is disposed immediately.
///
/// The slot is clonable; clones share the same occupant.
#[derive(Clone, Default)]
pub struct SerialSlot {
    inner: Arc<SlotInner>,
}

enum SlotState {
    Live(Option<BoxDisposable>),
    Terminated,
}

struct SlotInner {
    state: Mutex<SlotState>,
}

impl Default for SlotInner {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState::Live(None)),
        }
    }
}

impl SerialSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new occupant.
    ///
    /// The previous occupant, if any, is disposed before the new handle
    /// becomes current. If the slot is terminal, the incoming handle is
    /// disposed immediately.
    pub fn set<D: Disposable + 'static>(&self, disposable: D) {
        let incoming: BoxDisposable = Box::new(disposable);

        let previous = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                SlotState::Live(current) => Some(current.take()),
                SlotState::Terminated => None,
            }
        };
        let Some(previous) = previous else {
            trace!("set on terminal slot, disposing incoming handle");
            incoming.dispose();
            return;
        };
        if let Some(previous) = previous {
            previous.dispose();
        }

        // The slot may have been disposed while the previous occupant was
        // being released; the incoming handle must not outlive the slot.
        let stale = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                SlotState::Live(current) => {
                    *current = Some(incoming);
                    None
                }
                SlotState::Terminated => Some(incoming),
            }
        };
        if let Some(handle) = stale {
            handle.dispose();
        }
    }

    /// Disposes and removes the occupant without terminating the slot.
    pub fn clear(&self) {
        let previous = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                SlotState::Live(current) => current.take(),
                SlotState::Terminated => None,
            }
        };
        if let Some(previous) = previous {
            previous.dispose();
        }
    }

    /// Disposes the current occupant, then installs the factory's product.
    ///
    /// The old resource is released before the factory runs, so two live
    /// resources never coexist even transiently.
    pub fn update<D, F>(&self, factory: F)
    where
        D: Disposable + 'static,
        F: FnOnce() -> D,
    {
        self.clear();
        self.set(factory());
    }

    /// Performs [`update`](Self::update) only when `condition` holds.
    ///
    /// With a false condition the current occupant is left untouched and the
    /// factory is never invoked.
    pub fn update_if<D, F>(&self, condition: bool, factory: F)
    where
        D: Disposable + 'static,
        F: FnOnce() -> D,
    {
        if condition {
            self.update(factory);
        }
    }

    /// Returns whether the slot currently holds a handle.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        matches!(&*self.inner.state.lock(), SlotState::Live(Some(_)))
    }
}

impl Disposable for SerialSlot {
    fn dispose(&self) {
        let occupant = {
            let mut state = self.inner.state.lock();
            match mem::replace(&mut *state, SlotState::Terminated) {
                SlotState::Live(occupant) => occupant,
                SlotState::Terminated => return,
            }
        };
        if let Some(occupant) = occupant {
            occupant.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        matches!(&*self.inner.state.lock(), SlotState::Terminated)
    }
}

impl Drop for SlotInner {
    fn drop(&mut self) {
        let state = mem::replace(self.state.get_mut(), SlotState::Terminated);
        if let SlotState::Live(Some(occupant)) = state {
            occupant.dispose();
        }
    }
}

impl std::fmt::Debug for SerialSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSlot")
            .field("occupied", &self.is_occupied())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
