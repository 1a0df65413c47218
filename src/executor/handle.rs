//! Result handles for submitted tasks.
//!
//! `submit` pairs every task with a one-shot channel: the sender is the
//! promise half, captured inside the task envelope and written exactly
//! once by the executing worker; the [`JoinHandle`] wraps the receiving
//! half and is the caller's only way to observe the outcome.

use super::task::TaskId;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// What the worker writes into the promise: the task's value, or the
/// message of the panic that killed it.
pub(crate) type TaskOutcome<T> = Result<T, String>;

/// Failure reported by a [`JoinHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// The task panicked while executing; carries the panic message.
    #[error("task panicked: {0}")]
    Panic(String),

    /// The task envelope was dropped before it ran: the pool shut down
    /// while the task was still pending, or the task was submitted after
    /// shutdown had begun.
    #[error("task dropped before it ran")]
    Detached,

    /// `join_timeout` gave up before the task finished.
    #[error("timed out waiting for task")]
    Timeout,
}

/// Read-side handle to the eventual result of a submitted task.
///
/// The handle resolves exactly once: either with the value the task
/// produced or with the failure that ended it. Dropping the handle
/// detaches the task without cancelling it.
pub struct JoinHandle<T> {
    id: TaskId,
    rx: Receiver<TaskOutcome<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(id: TaskId, rx: Receiver<TaskOutcome<T>>) -> Self {
        Self { id, rx }
    }

    /// Identifier of the task this handle belongs to.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Block until the task's value or failure is available.
    pub fn join(self) -> Result<T, JoinError> {
        match self.rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(msg)) => Err(JoinError::Panic(msg)),
            Err(_) => Err(JoinError::Detached),
        }
    }

    /// Like [`join`](Self::join), but give up after `timeout`.
    pub fn join_timeout(self, timeout: Duration) -> Result<T, JoinError> {
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(msg)) => Err(JoinError::Panic(msg)),
            Err(RecvTimeoutError::Timeout) => Err(JoinError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(JoinError::Detached),
        }
    }

    /// Poll for the result without blocking. Returns `None` while the
    /// task has not finished.
    pub fn try_join(&self) -> Option<Result<T, JoinError>> {
        match self.rx.try_recv() {
            Ok(Ok(value)) => Some(Ok(value)),
            Ok(Err(msg)) => Some(Err(JoinError::Panic(msg))),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(JoinError::Detached)),
        }
    }
}

impl<T> std::fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinHandle").field("id", &self.id).finish()
    }
}
