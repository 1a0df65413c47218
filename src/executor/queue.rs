//! The shared task queue.

use super::task::Task;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Unbounded FIFO of pending tasks, guarded by a single mutex.
///
/// Every operation acquires the mutex for its full duration, so no two
/// threads ever observe or mutate the sequence at the same time. None of
/// the operations block waiting for work; sleeping and wakeup are layered
/// above in the pool.
pub(crate) struct TaskQueue {
    inner: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Element count. Only a point-in-time snapshot under concurrent
    /// producers and consumers.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Append a task at the tail. Never blocks; the queue has no capacity
    /// limit.
    pub fn push(&self, task: Task) {
        self.inner.lock().push_back(task);
    }

    /// Remove and return the head, or `None` when empty. Ownership moves
    /// to the caller without copying the payload.
    pub fn pop(&self) -> Option<Task> {
        self.inner.lock().pop_front()
    }

    /// Drop every pending task, returning how many were discarded.
    pub fn drain(&self) -> usize {
        let mut queue = self.inner.lock();
        let dropped = queue.len();
        queue.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn pop_on_empty_returns_none() {
        let queue = TaskQueue::new();
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn fifo_order_preserved() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..10 {
            let log = log.clone();
            queue.push(Task::new(move || log.lock().push(i)));
        }
        assert_eq!(queue.len(), 10);

        while let Some(task) = queue.pop() {
            task.run();
        }

        assert_eq!(*log.lock(), (0..10).collect::<Vec<_>>());
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_reports_dropped_count() {
        let queue = TaskQueue::new();
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let ran = ran.clone();
            queue.push(Task::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(queue.drain(), 5);
        assert!(queue.is_empty());
        // dropped, never executed
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
