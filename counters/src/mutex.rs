//! The fix, take one: a mutex around the read-modify-write.

use std::sync::Arc;

use tokio::{sync::Mutex, task};
use tokio_util::task::TaskTracker;
use tracing::trace;

use crate::probe::{Observer, SectionEvent};

/// Spawns `n` tasks that increment one shared counter under a
/// [`tokio::sync::Mutex`], waits for all of them, and returns the final
/// value: exactly `n`, every run, for any `n`.
///
/// The critical section is the same read/suspend/write as the unsynchronized
/// variant; the one change is that each task holds the lock across it, so at
/// most one task is between the read and the write at any instant. The guard
/// is released by scope exit on every path out of the section. The lock has
/// to cover the read-modify-write itself: taking it around `spawn` in the
/// dispatch loop would serialize the loop, which never touches the counter,
/// and leave the race intact.
pub async fn run(n: usize) -> u64 {
    run_observed(n, |_: SectionEvent| {}).await
}

pub(crate) async fn run_observed(n: usize, observe: impl Observer) -> u64 {
    let counter = Arc::new(Mutex::new(0u64));
    let observe = Arc::new(observe);
    let tracker = TaskTracker::new();

    for _ in 0..n {
        let counter = Arc::clone(&counter);
        let observe = Arc::clone(&observe);
        tracker.spawn(async move {
            // The guard lives across an await; that is what the tokio mutex
            // is for, a std::sync guard could not be held here.
            let mut slot = counter.lock().await;
            observe(SectionEvent::Entered);
            let seen = *slot;
            task::yield_now().await;
            *slot = seen + 1;
            trace!(wrote = seen + 1, "locked increment");
            observe(SectionEvent::Exited);
        });
    }

    tracker.close();
    tracker.wait().await;

    let final_value = *counter.lock().await;
    final_value
}
