//! Error types for pool construction and lifecycle operations.

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by pool construction and lifecycle operations.
///
/// Task-level failure never appears here; it travels through
/// [`JoinError`](crate::executor::JoinError) on the handle returned by
/// `submit`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// `start` was called on a pool whose workers are already running.
    #[error("pool already started")]
    AlreadyStarted,

    /// Worker thread management failed.
    #[error("executor error: {0}")]
    Executor(String),
}

impl Error {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }
}
