//! THREADWELL - a fixed-size worker pool with promised results
//!
//! Caller-submitted closures run asynchronously on a bounded set of
//! background OS threads; every submission returns a handle through which
//! the caller later obtains the closure's value or its propagated panic.
//! All blocking is plain mutex + condition variable: one mutex guards the
//! FIFO task queue, a second, dedicated one carries the idle-wait
//! protocol, and workers are woken through a condition variable whose
//! predicate is re-checked on every wakeup.
//!
//! # Quick Start
//!
//! ```
//! use threadwell::WorkerPool;
//!
//! # fn main() -> threadwell::Result<()> {
//! let mut pool = WorkerPool::with_threads(4)?;
//! pool.start()?;
//!
//! let handle = pool.submit(|| 2 + 2);
//! assert_eq!(handle.join().unwrap(), 4);
//!
//! pool.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Fixed pool size**: thread count chosen at construction (default 4),
//!   immutable for the pool's lifetime
//! - **Promised results**: `submit` returns a [`JoinHandle`] that yields
//!   the task's value or its panic, exactly once
//! - **FIFO dispatch**: one shared unbounded queue, dequeued in
//!   submission order
//! - **Panic isolation**: a panicking task fails only its own handle and
//!   never takes a worker thread down
//! - **Deterministic shutdown**: `shutdown` wakes every worker and joins
//!   all of them before returning; tasks still pending are dropped and
//!   their handles report it

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;

pub use config::{Config, ConfigBuilder, DEFAULT_WORKER_THREADS};
pub use error::{Error, Result};
pub use executor::{JoinError, JoinHandle, TaskId, WorkerPool};
