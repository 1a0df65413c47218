//! Task execution infrastructure.
//!
//! This module provides the core primitives: the shared task queue, the
//! task envelope and its result handle, worker threads, and the pool
//! that ties their lifecycles together.

pub mod handle;
pub mod pool;
pub mod queue;
pub mod task;
pub mod worker;

pub use handle::{JoinError, JoinHandle};
pub use pool::WorkerPool;
pub use task::TaskId;
