//! Closure-backed leaf disposable.

use parking_lot::Mutex;
use std::sync::Arc;

use super::Disposable;

/// A disposable handle that runs a one-shot closure on release.
///
/// The guard is clonable; all clones share the same underlying action, so
/// disposing any clone releases the resource and every clone observes the
/// disposed state. If the last clone is dropped without an explicit dispose,
/// the action runs then.
#[derive(Clone)]
pub struct DisposeGuard {
    inner: Arc<GuardInner>,
}

struct GuardInner {
    action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl DisposeGuard {
    /// Creates a guard that runs `action` exactly once on release.
    #[must_use]
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            inner: Arc::new(GuardInner {
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// Creates a guard that releases nothing.
    ///
    /// Useful as a placeholder occupant where a real handle is installed
    /// later.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|| {})
    }
}

impl Disposable for DisposeGuard {
    fn dispose(&self) {
        let action = self.inner.action.lock().take();
        // Run outside the lock so the action may touch this guard again.
        if let Some(action) = action {
            action();
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.action.lock().is_none()
    }
}

impl Drop for GuardInner {
    fn drop(&mut self) {
        if let Some(action) = self.action.get_mut().take() {
            action();
        }
    }
}

impl std::fmt::Debug for DisposeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposeGuard")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
