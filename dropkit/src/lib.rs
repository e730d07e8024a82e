//! # Dropkit
//!
//! Composable disposable-resource lifecycle utilities.
//!
//! Dropkit lets application code compose, chain, and scope the release of
//! many resources without hand-writing cleanup logic at each call site:
//!
//! - **Disposable handles**: a single idempotent release operation per
//!   resource, with RAII backstop on drop
//! - **Composite containers**: release a group of handles together, in
//!   registration order, exactly once
//! - **Serial slots**: a single mutable holder that releases the previous
//!   occupant on replacement
//! - **Scheduler-bound creation**: create and destroy context-affine
//!   resources only on their designated execution context
//! - **Cancellation linkage**: release a handle when an external signal
//!   fires
//!
//! ## Quick Start
//!
//! ```rust
//! use dropkit::prelude::*;
//!
//! let scope = CompositeDisposable::new();
//!
//! let subscription = DisposeGuard::new(|| { /* release the resource */ })
//!     .dispose_with(&scope);
//!
//! // ... use the subscription ...
//!
//! scope.dispose(); // releases everything registered, in order
//! assert!(subscription.is_disposed());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod disposable;
pub mod errors;
pub mod ext;
pub mod factory;
pub mod scheduler;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::disposable::{
        BoxDisposable, CompositeDisposable, Disposable, DisposeGuard, SerialSlot,
    };
    pub use crate::errors::DisposeError;
    pub use crate::ext::{
        chain, dispose_all, register_all, to_composite, DisposeWith, OptionDisposeExt,
    };
    pub use crate::factory::DisposableFactory;
    pub use crate::scheduler::{
        create_and_dispose_on, create_and_dispose_on1, create_and_dispose_on2,
        ImmediateScheduler, ScheduledDisposable, Scheduler, TokioScheduler,
    };
}
