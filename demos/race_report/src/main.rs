// Example: one shared counter, three concurrency disciplines
// Runs each experiment twice so the nondeterminism (or determinism) of the
// result is visible side by side.

use counters::{mutex, semaphore, unsync};
use tracing_subscriber::EnvFilter;

// How many tasks each experiment spawns.
const TASKS: usize = 1000;

#[tokio::main]
async fn main() {
    // Diagnostics are opt-in: stdout stays clean unless RUST_LOG asks for
    // the trace events emitted inside the critical sections.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("******** unsynchronized count ********");
    println!("first call result:  {}", unsync::run(TASKS).await);
    println!("second call result: {}", unsync::run(TASKS).await);
    println!(
        "----------------------------------------\n\
         {TASKS} tasks each added 1, but with nothing synchronizing them the\n\
         read-modify-write steps interleave and updates get lost. The totals\n\
         above are whatever the scheduler happened to produce; calling the\n\
         function again keeps producing different numbers.\n\
         ----------------------------------------"
    );

    println!("******** count behind a mutex ********");
    println!("first call result:  {}", mutex::run(TASKS).await);
    println!("second call result: {}", mutex::run(TASKS).await);
    println!(
        "----------------------------------------\n\
         With the read-modify-write inside a locked critical section, no two\n\
         tasks can touch the counter at the same time, so every run lands on\n\
         exactly {TASKS}.\n\
         ----------------------------------------"
    );

    println!("******** count behind a channel ********");
    println!("first call result:  {}", semaphore::run(TASKS).await);
    println!("second call result: {}", semaphore::run(TASKS).await);
    println!(
        "----------------------------------------\n\
         A bounded channel with a single slot serializes the tasks just as\n\
         well: a task deposits a token to enter its critical section and\n\
         takes the token back out to leave, so the result is again {TASKS}.\n\
         It works, but it is a lock wearing a channel costume. Channels are\n\
         meant for passing data between tasks, not for mutual exclusion.\n\
         ----------------------------------------"
    );
}
