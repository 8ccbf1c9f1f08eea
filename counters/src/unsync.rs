//! The race: concurrent increments with no synchronization at all.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::task;
use tokio_util::task::TaskTracker;
use tracing::trace;

use crate::probe::{Observer, SectionEvent};

/// Spawns `n` tasks that each increment one shared counter with nothing
/// guarding the read-modify-write, waits for all of them, and returns the
/// final value.
///
/// The increment is three steps (read the counter, yield back to the
/// scheduler, write the incremented value) and the tasks interleave those
/// steps freely. Two tasks that read the same value write the same value, and
/// one of the two updates is lost. For `n >= 1` the result lands somewhere in
/// `1..=n`, usually well short of `n`, and repeated calls keep producing
/// different numbers. Nothing here can fail; the wrong count *is* the
/// observable behavior.
pub async fn run(n: usize) -> u64 {
    run_observed(n, |_: SectionEvent| {}).await
}

pub(crate) async fn run_observed(n: usize, observe: impl Observer) -> u64 {
    let counter = Arc::new(AtomicU64::new(0));
    let observe = Arc::new(observe);
    let tracker = TaskTracker::new();

    for _ in 0..n {
        let counter = Arc::clone(&counter);
        let observe = Arc::clone(&observe);
        tracker.spawn(async move {
            observe(SectionEvent::Entered);
            // Each step is atomic on its own; nothing makes the pair atomic.
            let seen = counter.load(Ordering::Relaxed);
            task::yield_now().await;
            counter.store(seen + 1, Ordering::Relaxed);
            trace!(wrote = seen + 1, "unsynchronized increment");
            observe(SectionEvent::Exited);
        });
    }

    // Completion barrier: close() stops admissions, wait() resolves once
    // every spawned task has finished.
    tracker.close();
    tracker.wait().await;

    counter.load(Ordering::Relaxed)
}
