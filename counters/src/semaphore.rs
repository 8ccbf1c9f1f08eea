//! The fix, take two: a capacity-1 channel standing in for a lock.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::task;
use tokio_util::task::TaskTracker;
use tracing::trace;

use crate::probe::{Observer, SectionEvent};

/// Occupies the channel's single slot while a worker is inside its critical
/// section.
struct Token;

/// Spawns `n` tasks that increment one shared counter behind a binary
/// semaphore built from a bounded channel, waits for all of them, and returns
/// the final value: exactly `n`, every run, for any `n`.
///
/// The channel holds at most one [`Token`]. Acquiring the slot means sending
/// a token (the send blocks while another worker's token is still in the
/// channel); releasing it means receiving the token back out. Only one
/// token can be in flight, so only one read-modify-write runs at a time:
/// functionally the mutex variant, expressed as message passing.
///
/// This is a deliberate misuse. Channels exist to move data between tasks;
/// bending one into a lock works, but when mutual exclusion is all that is
/// needed, reach for a mutex (or [`tokio::sync::Semaphore`]) instead.
pub async fn run(n: usize) -> u64 {
    run_observed(n, |_: SectionEvent| {}).await
}

pub(crate) async fn run_observed(n: usize, observe: impl Observer) -> u64 {
    let counter = Arc::new(AtomicU64::new(0));
    let observe = Arc::new(observe);
    // One slot: a second sender blocks until the first token is drained.
    let (slot_in, slot_out) = async_channel::bounded::<Token>(1);
    let tracker = TaskTracker::new();

    for _ in 0..n {
        let counter = Arc::clone(&counter);
        let observe = Arc::clone(&observe);
        let slot_in = slot_in.clone();
        let slot_out = slot_out.clone();
        tracker.spawn(async move {
            slot_in
                .send(Token)
                .await
                .expect("both channel ends outlive the workers");
            observe(SectionEvent::Entered);
            let seen = counter.load(Ordering::Relaxed);
            task::yield_now().await;
            counter.store(seen + 1, Ordering::Relaxed);
            trace!(wrote = seen + 1, "token-guarded increment");
            observe(SectionEvent::Exited);
            slot_out
                .recv()
                .await
                .expect("both channel ends outlive the workers");
        });
    }

    tracker.close();
    tracker.wait().await;

    counter.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use crate::probe::support::SectionLog;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn critical_sections_never_overlap() {
        let log = SectionLog::new();
        let count = super::run_observed(1_000, log.observer()).await;
        assert_eq!(count, 1_000);
        assert!(!log.overlapped());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn returns_only_after_every_worker_finished() {
        let log = SectionLog::new();
        super::run_observed(250, log.observer()).await;
        assert_eq!(log.exits(), 250);
    }
}
