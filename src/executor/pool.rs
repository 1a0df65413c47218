//! The worker pool: lifecycle, submission, and the wait/notify protocol.

use super::handle::{JoinHandle, TaskOutcome};
use super::queue::TaskQueue;
use super::task::Task;
use super::worker::{Worker, WorkerId};
use crate::config::Config;
use crate::error::{Error, Result};
use crossbeam_channel::bounded;
use parking_lot::{Condvar, Mutex};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle as ThreadHandle};
use tracing::{debug, trace, warn};

/// State shared between the pool handle and its worker threads: the task
/// queue, the wait/notify protocol, and the shutdown flag.
///
/// Workers hold `Arc` clones of this struct, never ownership of the pool
/// itself. The pool joins every worker before it can be dropped, so the
/// shared state outlives all of them.
pub(crate) struct PoolShared {
    pub(crate) queue: TaskQueue,
    /// Dedicated mutex for the idle-wait protocol. Never held while a
    /// task executes.
    pub(crate) sleeper: Mutex<()>,
    pub(crate) work_available: Condvar,
    /// Monotonic: flips false -> true once, never back.
    shutdown: AtomicBool,
    pub(crate) completed: AtomicUsize,
}

impl PoolShared {
    fn new() -> Self {
        Self {
            queue: TaskQueue::new(),
            sleeper: Mutex::new(()),
            work_available: Condvar::new(),
            shutdown: AtomicBool::new(false),
            completed: AtomicUsize::new(0),
        }
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Wake one idle worker. The sleeper mutex is held across the notify
    /// so the signal cannot land between a worker's emptiness check and
    /// its wait.
    fn notify_one(&self) {
        let _held = self.sleeper.lock();
        self.work_available.notify_one();
    }

    fn begin_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        let _held = self.sleeper.lock();
        self.work_available.notify_all();
    }
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<ThreadHandle<()>>,
}

/// A fixed-size pool of background worker threads.
///
/// Construction allocates the shared state but spawns nothing;
/// [`start`](Self::start) brings the workers up, and tasks submitted
/// before that simply queue until they exist. The pool is the exclusive
/// owner of its worker threads and joins them all in
/// [`shutdown`](Self::shutdown) (also run on drop).
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<WorkerHandle>,
    config: Config,
    started: bool,
}

impl WorkerPool {
    /// Create an un-started pool with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an un-started pool with `n` worker threads.
    pub fn with_threads(n: usize) -> Result<Self> {
        Self::with_config(Config::builder().num_threads(n).build()?)
    }

    /// Create an un-started pool from a configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            shared: Arc::new(PoolShared::new()),
            workers: Vec::new(),
            config,
            started: false,
        })
    }

    /// Spawn one background thread per configured worker slot.
    ///
    /// Must be called once; a second call returns
    /// [`Error::AlreadyStarted`]. Submissions made before `start` begin
    /// executing as soon as the workers are up.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }

        let num_threads = self.config.worker_threads();
        self.workers.reserve(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id);
            let shared = Arc::clone(&self.shared);
            let name = format!("{}-{}", self.config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = self.config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let thread = builder
                .spawn(move || worker.run(&shared))
                .map_err(|e| Error::executor(format!("spawn failed: {}", e)))?;

            self.workers.push(WorkerHandle {
                id,
                thread: Some(thread),
            });
        }

        self.started = true;
        debug!(threads = num_threads, "pool started");
        Ok(())
    }

    /// Submit a closure and get a handle to its eventual result.
    ///
    /// The closure is bound into a type-erased envelope that runs it,
    /// captures its value or panic, and fulfills the promise; the
    /// envelope is enqueued, one idle worker is woken, and the handle is
    /// returned immediately; submission never waits for execution.
    ///
    /// Exactly one execution per submitted task; the handle resolves
    /// exactly once. After shutdown has begun the task is discarded and
    /// the returned handle reports
    /// [`JoinError::Detached`](super::JoinError::Detached).
    pub fn submit<F, T>(&self, f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = bounded::<TaskOutcome<T>>(1);

        let task = Task::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| super::task::panic_message(&*payload));
            // receiver may already be gone; the result is then discarded
            let _ = tx.send(outcome);
        });
        let handle = JoinHandle::new(task.id(), rx);

        if self.shared.is_shutdown() {
            // drops the envelope and with it the promise sender
            debug!(task = ?handle.id(), "submit after shutdown, task discarded");
            return handle;
        }

        trace!(task = ?handle.id(), "task submitted");
        self.shared.queue.push(task);
        self.shared.notify_one();
        handle
    }

    /// Fire-and-forget submission: no handle, failures only logged.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.shared.is_shutdown() {
            warn!("execute after shutdown, task discarded");
            return;
        }

        self.shared.queue.push(Task::new(f));
        self.shared.notify_one();
    }

    /// Number of live worker threads.
    pub fn size(&self) -> usize {
        self.workers.iter().filter(|w| w.thread.is_some()).count()
    }

    /// Configured worker thread count.
    pub fn num_threads(&self) -> usize {
        self.config.worker_threads()
    }

    /// Snapshot of the pending-task count.
    pub fn queued(&self) -> usize {
        self.shared.queue.len()
    }

    /// Tasks that have finished executing.
    pub fn completed_tasks(&self) -> usize {
        self.shared.completed.load(Ordering::Relaxed)
    }

    /// Stop the pool: raise the shutdown flag, wake every worker, and
    /// join their threads, blocking until all of them have exited.
    ///
    /// Pending tasks that no worker had dequeued are dropped afterwards
    /// ("drop pending" policy); their handles report
    /// [`JoinError::Detached`](super::JoinError::Detached). A worker
    /// that is mid-task finishes that task first. Calling `shutdown`
    /// again is a no-op.
    pub fn shutdown(&mut self) {
        if !self.shared.is_shutdown() {
            debug!("shutting down pool");
            self.shared.begin_shutdown();
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!(worker = worker.id, "worker thread panicked");
                } else {
                    trace!(worker = worker.id, "worker joined");
                }
            }
        }

        if !self.shared.queue.is_empty() {
            let dropped = self.shared.queue.drain();
            debug!(dropped, "pending tasks dropped at shutdown");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads())
            .field("started", &self.started)
            .field("queued", &self.queued())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threads_is_a_config_error() {
        assert!(WorkerPool::with_threads(0).is_err());
    }

    #[test]
    fn start_twice_fails() {
        let mut pool = WorkerPool::with_threads(1).unwrap();
        pool.start().unwrap();

        assert!(matches!(pool.start(), Err(Error::AlreadyStarted)));
        pool.shutdown();
    }

    #[test]
    fn starts_configured_thread_count() {
        let mut pool = WorkerPool::with_threads(3).unwrap();
        assert_eq!(pool.size(), 0);

        pool.start().unwrap();
        assert_eq!(pool.size(), 3);

        pool.shutdown();
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut pool = WorkerPool::with_threads(2).unwrap();
        pool.start().unwrap();

        pool.shutdown();
        pool.shutdown();
        assert_eq!(pool.size(), 0);
    }
}
