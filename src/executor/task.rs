//! Task representation and execution.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a submitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Internal task envelope: a type-erased, zero-argument unit of work.
///
/// The envelope is created at submission, owned by the queue until
/// dequeued, owned by the executing worker while it runs, and destroyed
/// afterwards. Running it consumes it, so a task can never execute twice.
pub(crate) struct Task {
    id: TaskId,
    func: Box<dyn FnOnce() + Send + 'static>,
    spawn_time: Instant,
}

impl Task {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            id: TaskId::next(),
            func: Box::new(f),
            spawn_time: Instant::now(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Time spent between submission and now.
    pub fn queued_for(&self) -> Duration {
        self.spawn_time.elapsed()
    }

    /// Execute the task, consuming the envelope.
    pub fn run(self) {
        (self.func)();
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("spawn_time", &self.spawn_time)
            .finish()
    }
}

/// Extract a printable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn task_ids_are_unique() {
        let a = Task::new(|| {});
        let b = Task::new(|| {});
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn run_invokes_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = {
            let calls = calls.clone();
            Task::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        task.run();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panic_message_downcasts_common_payloads() {
        let err = std::panic::catch_unwind(|| panic!("static str")).unwrap_err();
        assert_eq!(panic_message(&*err), "static str");

        let err = std::panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(&*err), "formatted 42");

        let err = std::panic::catch_unwind(|| std::panic::panic_any(7u32)).unwrap_err();
        assert_eq!(panic_message(&*err), "unknown panic");
    }
}
