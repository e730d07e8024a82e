//! Execution-context abstraction for scheduler-bound creation and disposal.
//!
//! This module provides:
//! - The [`Scheduler`] trait for running work on a designated context
//! - [`TokioScheduler`] backed by a tokio runtime handle
//! - [`ImmediateScheduler`] running work inline (useful in tests)
//! - [`ScheduledDisposable`] and the `create_and_dispose_on` wrappers for
//!   resources that must only be touched on their designated context

mod scheduled;

pub use scheduled::{
    create_and_dispose_on, create_and_dispose_on1, create_and_dispose_on2, ScheduledDisposable,
};

/// An execution context able to run a unit of work.
///
/// No scheduling is implemented in this crate; the trait is the seam
/// through which callers hand in a runtime. Work submitted to the same
/// scheduler may run in any order relative to other submissions.
pub trait Scheduler: Send + Sync {
    /// Submits a unit of work to this execution context.
    fn schedule(&self, work: Box<dyn FnOnce() + Send>);
}

/// A scheduler that spawns work onto a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Creates a scheduler for the given runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler for the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, as
    /// [`tokio::runtime::Handle::current`] does.
    #[must_use]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, work: Box<dyn FnOnce() + Send>) {
        // Detached: completion is observed through the disposable contract,
        // not the join handle.
        drop(self.handle.spawn(async move { work() }));
    }
}

/// A scheduler that runs work inline on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, work: Box<dyn FnOnce() + Send>) {
        work();
    }
}
