//! Ordered group release of disposable handles.

use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;
use tracing::trace;

use super::{BoxDisposable, Disposable};
use crate::errors::DisposeError;

/// An ordered collection of handles released together, exactly once.
///
/// Disposing the container disposes every member in registration order and
/// moves the container to a terminal state. Adding to a terminal container
/// disposes the incoming handle immediately, so no handle registered with a
/// composite is ever leaked.
///
/// The container is clonable; clones share the same member list.
#[derive(Clone, Default)]
pub struct CompositeDisposable {
    inner: Arc<CompositeInner>,
}

enum State {
    Live(Vec<BoxDisposable>),
    Terminated,
}

struct CompositeInner {
    state: Mutex<State>,
}

impl Default for CompositeInner {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::Live(Vec::new())),
        }
    }
}

impl CompositeDisposable {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle for release when the container is disposed.
    ///
    /// If the container is already terminal, the handle is disposed
    /// immediately instead of stored.
    pub fn add<D: Disposable + 'static>(&self, disposable: D) {
        let boxed: BoxDisposable = Box::new(disposable);
        let rejected = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Live(members) => {
                    members.push(boxed);
                    None
                }
                State::Terminated => Some(boxed),
            }
        };
        if let Some(handle) = rejected {
            trace!("add on terminal container, disposing incoming handle");
            handle.dispose();
        }
    }

    /// Registers a handle, reporting when the container is terminal.
    ///
    /// On `Err` the incoming handle has been disposed rather than stored;
    /// terminal containers never hold live handles.
    pub fn try_add<D: Disposable + 'static>(&self, disposable: D) -> Result<(), DisposeError> {
        let boxed: BoxDisposable = Box::new(disposable);
        let rejected = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Live(members) => {
                    members.push(boxed);
                    None
                }
                State::Terminated => Some(boxed),
            }
        };
        match rejected {
            None => Ok(()),
            Some(handle) => {
                handle.dispose();
                Err(DisposeError::Terminated)
            }
        }
    }

    /// Registers every handle in a sequence, preserving iteration order.
    pub fn add_all<I, D>(&self, disposables: I)
    where
        I: IntoIterator<Item = D>,
        D: Disposable + 'static,
    {
        for disposable in disposables {
            self.add(disposable);
        }
    }

    /// Returns the number of handles currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        match &*self.inner.state.lock() {
            State::Live(members) => members.len(),
            State::Terminated => 0,
        }
    }

    /// Returns whether the container holds no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Disposable for CompositeDisposable {
    fn dispose(&self) {
        let members = {
            let mut state = self.inner.state.lock();
            match mem::replace(&mut *state, State::Terminated) {
                State::Live(members) => members,
                State::Terminated => return,
            }
        };
        trace!(count = members.len(), "disposing composite container");
        // Registration order, outside the lock.
        for member in members {
            member.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        matches!(&*self.inner.state.lock(), State::Terminated)
    }
}

impl<D: Disposable + 'static> FromIterator<D> for CompositeDisposable {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        let container = Self::new();
        container.add_all(iter);
        container
    }
}

impl Drop for CompositeInner {
    fn drop(&mut self) {
        let state = mem::replace(self.state.get_mut(), State::Terminated);
        if let State::Live(members) = state {
            for member in members {
                member.dispose();
            }
        }
    }
}

impl std::fmt::Debug for CompositeDisposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeDisposable")
            .field("len", &self.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
