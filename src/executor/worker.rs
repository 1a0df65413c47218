// worker thread loop

use super::pool::PoolShared;
use super::task::{panic_message, Task};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub(crate) type WorkerId = usize;

// per-worker counters
pub(crate) struct WorkerState {
    pub tasks_executed: AtomicU64,
}

impl WorkerState {
    fn new() -> Self {
        Self {
            tasks_executed: AtomicU64::new(0),
        }
    }
}

/// One worker: an integer id plus the loop its backing thread runs. The
/// worker never owns pool state; it borrows the shared internals handed
/// to `run` and exits only once the shutdown flag is observed.
pub(crate) struct Worker {
    pub id: WorkerId,
    pub state: Arc<WorkerState>,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            state: Arc::new(WorkerState::new()),
        }
    }

    // main loop: idle -> dequeue -> run, until shutdown
    pub fn run(&self, shared: &PoolShared) {
        debug!(worker = self.id, "worker online");

        while let Some(task) = self.next_task(shared) {
            self.execute_task(task);
            shared.completed.fetch_add(1, Ordering::Relaxed);
        }

        debug!(
            worker = self.id,
            executed = self.state.tasks_executed.load(Ordering::Relaxed),
            "worker terminated"
        );
    }

    /// Wait for a task, or `None` once shutdown is requested.
    ///
    /// The predicate is re-evaluated on every wakeup, so spurious wakeups
    /// and pops lost to a sibling worker both just loop back into the
    /// wait. Shutdown is checked before the queue: pending tasks are not
    /// drained once the flag is up.
    fn next_task(&self, shared: &PoolShared) -> Option<Task> {
        let mut idle = shared.sleeper.lock();
        loop {
            if shared.is_shutdown() {
                return None;
            }
            if let Some(task) = shared.queue.pop() {
                return Some(task);
            }
            shared.work_available.wait(&mut idle);
        }
    }

    // runs with no locks held
    fn execute_task(&self, task: Task) {
        let id = task.id();
        trace!(
            worker = self.id,
            task = ?id,
            queued_for = ?task.queued_for(),
            "task dequeued"
        );

        // backstop for fire-and-forget closures; promised tasks capture
        // their own panic inside the envelope
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task.run())) {
            warn!(
                worker = self.id,
                task = ?id,
                "task panicked: {}",
                panic_message(&*payload)
            );
        }

        self.state.tasks_executed.fetch_add(1, Ordering::Relaxed);
    }
}
