//! Hooks that let tests watch the experiments' critical sections.

/// Emitted by the instrumented runs as each worker moves through its critical
/// section: `Entered` just before the shared counter is read, `Exited` just
/// after the new value has been written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionEvent {
    Entered,
    Exited,
}

/// Observer shape shared by the `run_observed` variants.
pub(crate) trait Observer: Fn(SectionEvent) + Send + Sync + 'static {}

impl<F> Observer for F where F: Fn(SectionEvent) + Send + Sync + 'static {}

#[cfg(test)]
pub(crate) mod support {
    use std::sync::{
        atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering},
        Arc,
    };

    use super::SectionEvent;

    /// What an instrumented run saw: whether two critical sections were ever
    /// in flight at once, and how many workers finished theirs.
    pub(crate) struct SectionLog {
        in_flight: AtomicIsize,
        overlapped: AtomicBool,
        exits: AtomicUsize,
    }

    impl SectionLog {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                in_flight: AtomicIsize::new(0),
                overlapped: AtomicBool::new(false),
                exits: AtomicUsize::new(0),
            })
        }

        pub(crate) fn observer(
            self: &Arc<Self>,
        ) -> impl Fn(SectionEvent) + Send + Sync + 'static {
            let log = Arc::clone(self);
            move |event| match event {
                SectionEvent::Entered => {
                    if log.in_flight.fetch_add(1, Ordering::SeqCst) != 0 {
                        log.overlapped.store(true, Ordering::SeqCst);
                    }
                }
                SectionEvent::Exited => {
                    log.in_flight.fetch_sub(1, Ordering::SeqCst);
                    log.exits.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        pub(crate) fn overlapped(&self) -> bool {
            self.overlapped.load(Ordering::SeqCst)
        }

        pub(crate) fn exits(&self) -> usize {
            self.exits.load(Ordering::SeqCst)
        }
    }
}
