//! Scheduler-bound disposal and creation wrappers.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use super::Scheduler;
use crate::disposable::{BoxDisposable, Disposable, SerialSlot};

/// A handle whose disposal runs on a designated scheduler.
///
/// Disposing the handle submits the wrapped handle's disposal to the
/// scheduler instead of running it inline. Only the first dispose submits
/// work.
#[derive(Clone)]
pub struct ScheduledDisposable {
    inner: Arc<ScheduledInner>,
}

struct ScheduledInner {
    scheduler: Arc<dyn Scheduler>,
    target: Mutex<Option<BoxDisposable>>,
}

impl ScheduledDisposable {
    /// Wraps a handle so its disposal runs on `scheduler`.
    #[must_use]
    pub fn new<D: Disposable + 'static>(scheduler: Arc<dyn Scheduler>, target: D) -> Self {
        Self {
            inner: Arc::new(ScheduledInner {
                scheduler,
                target: Mutex::new(Some(Box::new(target))),
            }),
        }
    }
}

impl Disposable for ScheduledDisposable {
    fn dispose(&self) {
        let Some(target) = self.inner.target.lock().take() else {
            return;
        };
        debug!("scheduling disposal on designated context");
        self.inner
            .scheduler
            .schedule(Box::new(move || target.dispose()));
    }

    fn is_disposed(&self) -> bool {
        self.inner.target.lock().is_none()
    }
}

impl Drop for ScheduledInner {
    fn drop(&mut self) {
        if let Some(target) = self.target.get_mut().take() {
            self.scheduler.schedule(Box::new(move || target.dispose()));
        }
    }
}

impl std::fmt::Debug for ScheduledDisposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledDisposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// One scheduled creation: an empty slot is returned immediately, the
/// factory's product lands in it on the designated context. Either order of
/// the create and dispose submissions releases the product exactly once,
/// because a terminal slot disposes anything installed into it.
fn scheduled_create<D, F>(scheduler: &Arc<dyn Scheduler>, factory: F) -> ScheduledDisposable
where
    D: Disposable + 'static,
    F: FnOnce() -> D + Send + 'static,
{
    let slot = SerialSlot::new();
    let target = slot.clone();
    debug!("scheduling resource creation on designated context");
    scheduler.schedule(Box::new(move || target.set(factory())));
    ScheduledDisposable::new(scheduler.clone(), slot)
}

/// Binds a factory to a scheduler so its product is created and disposed
/// only on that execution context.
///
/// Each invocation of the returned factory creates an empty [`SerialSlot`],
/// submits the original factory to the scheduler with the slot as its
/// destination, and immediately returns a [`ScheduledDisposable`] over the
/// slot. Disposing the returned handle before creation completes still
/// releases the created resource once it exists.
pub fn create_and_dispose_on<D, F>(
    factory: F,
    scheduler: Arc<dyn Scheduler>,
) -> impl Fn() -> ScheduledDisposable
where
    D: Disposable + 'static,
    F: Fn() -> D + Send + Sync + 'static,
{
    let factory = Arc::new(factory);
    move || {
        let factory = factory.clone();
        scheduled_create(&scheduler, move || (*factory)())
    }
}

/// One-parameter variant of [`create_and_dispose_on`].
///
/// The argument is captured per invocation and handed to the factory on the
/// designated context.
pub fn create_and_dispose_on1<T0, D, F>(
    factory: F,
    scheduler: Arc<dyn Scheduler>,
) -> impl Fn(T0) -> ScheduledDisposable
where
    T0: Send + 'static,
    D: Disposable + 'static,
    F: Fn(T0) -> D + Send + Sync + 'static,
{
    let factory = Arc::new(factory);
    move |t0| {
        let factory = factory.clone();
        scheduled_create(&scheduler, move || (*factory)(t0))
    }
}

/// Two-parameter variant of [`create_and_dispose_on`].
pub fn create_and_dispose_on2<T0, T1, D, F>(
    factory: F,
    scheduler: Arc<dyn Scheduler>,
) -> impl Fn(T0, T1) -> ScheduledDisposable
where
    T0: Send + 'static,
    T1: Send + 'static,
    D: Disposable + 'static,
    F: Fn(T0, T1) -> D + Send + Sync + 'static,
{
    let factory = Arc::new(factory);
    move |t0, t1| {
        let factory = factory.clone();
        scheduled_create(&scheduler, move || (*factory)(t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposable::DisposeGuard;
    use crate::scheduler::ImmediateScheduler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Collects submitted work and runs it only on demand, so tests can
    /// control the ordering of creation and disposal.
    #[derive(Default)]
    struct QueueScheduler {
        queue: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl QueueScheduler {
        fn run_all(&self) {
            let work = std::mem::take(&mut *self.queue.lock());
            for item in work {
                item();
            }
        }

        fn pending(&self) -> usize {
            self.queue.lock().len()
        }
    }

    impl Scheduler for QueueScheduler {
        fn schedule(&self, work: Box<dyn FnOnce() + Send>) {
            self.queue.lock().push(work);
        }
    }

    #[test]
    fn test_scheduled_disposable_disposes_on_scheduler() {
        let scheduler = Arc::new(QueueScheduler::default());
        let guard = DisposeGuard::empty();

        let scheduled = ScheduledDisposable::new(scheduler.clone(), guard.clone());
        scheduled.dispose();

        // Submitted but not yet run.
        assert!(scheduled.is_disposed());
        assert!(!guard.is_disposed());

        scheduler.run_all();
        assert!(guard.is_disposed());
    }

    #[test]
    fn test_scheduled_disposable_submits_once() {
        let scheduler = Arc::new(QueueScheduler::default());
        let scheduled = ScheduledDisposable::new(scheduler.clone(), DisposeGuard::empty());

        scheduled.dispose();
        scheduled.dispose();

        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_creation_only_via_scheduler() {
        let scheduler = Arc::new(QueueScheduler::default());
        let created = Arc::new(AtomicUsize::new(0));
        let created_clone = created.clone();

        let factory = create_and_dispose_on(
            move || {
                created_clone.fetch_add(1, Ordering::SeqCst);
                DisposeGuard::empty()
            },
            scheduler.clone(),
        );

        let _handle = factory();

        // Nothing created until the scheduler runs.
        assert_eq!(created.load(Ordering::SeqCst), 0);

        scheduler.run_all();
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispose_before_creation_still_releases_resource() {
        let scheduler = Arc::new(QueueScheduler::default());
        let disposed = Arc::new(AtomicUsize::new(0));
        let disposed_clone = disposed.clone();

        let factory = create_and_dispose_on(
            move || {
                let disposed = disposed_clone.clone();
                DisposeGuard::new(move || {
                    disposed.fetch_add(1, Ordering::SeqCst);
                })
            },
            scheduler.clone(),
        );

        let handle = factory();
        handle.dispose();

        // Disposal was submitted before the creation ran; once both
        // submissions execute the resource is created and then released.
        scheduler.run_all();
        scheduler.run_all();

        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_create_and_dispose_immediate_roundtrip() {
        let scheduler: Arc<dyn Scheduler> = Arc::new(ImmediateScheduler);
        let disposed = Arc::new(AtomicUsize::new(0));
        let disposed_clone = disposed.clone();

        let factory = create_and_dispose_on(
            move || {
                let disposed = disposed_clone.clone();
                DisposeGuard::new(move || {
                    disposed.fetch_add(1, Ordering::SeqCst);
                })
            },
            scheduler,
        );

        let handle = factory();
        assert!(!handle.is_disposed());

        handle.dispose();
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_single_parameter_variant() {
        let scheduler: Arc<dyn Scheduler> = Arc::new(ImmediateScheduler);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let factory = create_and_dispose_on1(
            move |label: &'static str| {
                seen_clone.lock().push(label);
                DisposeGuard::empty()
            },
            scheduler,
        );

        let first = factory("timer");
        let second = factory("subscription");

        assert_eq!(seen.lock().clone(), vec!["timer", "subscription"]);

        first.dispose();
        second.dispose();
    }

    #[test]
    fn test_two_parameter_variant() {
        let scheduler: Arc<dyn Scheduler> = Arc::new(ImmediateScheduler);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let factory = create_and_dispose_on2(
            move |a: u32, b: u32| {
                seen_clone.lock().push((a, b));
                DisposeGuard::empty()
            },
            scheduler,
        );

        let handle = factory(1, 2);
        assert_eq!(seen.lock().clone(), vec![(1, 2)]);
        handle.dispose();
    }

    #[tokio::test]
    async fn test_tokio_bound_creation_and_disposal() {
        use crate::scheduler::TokioScheduler;

        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::current());
        let disposed = Arc::new(AtomicUsize::new(0));
        let disposed_clone = disposed.clone();

        let factory = create_and_dispose_on(
            move || {
                let disposed = disposed_clone.clone();
                DisposeGuard::new(move || {
                    disposed.fetch_add(1, Ordering::SeqCst);
                })
            },
            scheduler,
        );

        let handle = factory();
        handle.dispose();

        // Both the creation and the disposal run as spawned tasks.
        tokio::task::yield_now().await;
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while disposed.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("resource should be released once created");
    }
}
