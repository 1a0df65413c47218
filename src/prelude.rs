//! One-stop imports for the common API surface.

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{JoinError, JoinHandle, TaskId, WorkerPool};
