//! Shared-counter experiments: one data race and two ways to close it.
//!
//! Each module spawns `n` Tokio tasks that all increment a single shared
//! counter, waits for every task to finish, and returns the final value. The
//! increment is deliberately split into a read, a suspension point, and a
//! write, so the only thing that differs between the variants is the guard
//! around that critical section:
//!
//! - [`unsync`]: no guard at all; interleaved updates get lost and the
//!   result is nondeterministic
//! - [`mutex`]: a [`tokio::sync::Mutex`] held across the read-modify-write
//! - [`semaphore`]: a capacity-1 channel bent into a binary semaphore
//!
//! Both guarded variants return exactly `n` on every run.

pub mod mutex;
pub mod semaphore;
pub mod unsync;

mod probe;
