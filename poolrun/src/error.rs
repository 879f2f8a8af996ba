//! Error types for the process pool.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors surfaced by [`crate::PoolLauncher::launch`] and the
/// [`crate::WatchedProcess`] lifecycle operations.
///
/// The lifecycle variants (`InvalidPoolSize`, `AlreadyStarted`,
/// `NotStarted`) indicate caller bugs and are never retried.
/// `MissingExitStatus` means the platform reported a dead child without
/// an exit status, which violates the process contract and is treated
/// as unrecoverable.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The pool size must admit at least one process.
    #[error("pool size must be at least 1, got {0}")]
    InvalidPoolSize(usize),

    /// `start()` was called on a process that is already running or done.
    #[error("process already started: {0}")]
    AlreadyStarted(String),

    /// A lifecycle operation that requires a started process was called
    /// before `start()`.
    #[error("process not started: {0}")]
    NotStarted(String),

    /// The child process could not be spawned.
    #[error("failed to spawn process '{name}'")]
    Spawn {
        /// Label of the unit that failed to spawn.
        name: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A non-blocking liveness check failed at the OS level.
    #[error("failed to poll process '{name}'")]
    Poll {
        /// Label of the unit being polled.
        name: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Waiting for a child to exit failed at the OS level.
    #[error("failed to wait for process '{name}'")]
    Wait {
        /// Label of the unit being joined.
        name: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A child was observed dead but the platform yielded no exit status.
    #[error("process is not alive but has no exit status: {0}")]
    MissingExitStatus(String),

    /// A worker ran to completion with a non-success exit status.
    ///
    /// When several workers fail, only the earliest-submitted failure is
    /// reported; the others still run to completion but their statuses
    /// are not surfaced.
    #[error("problem during '{name}': {status}")]
    WorkerFailed {
        /// Label of the first failing unit in submission order.
        name: String,
        /// Its exit status.
        status: ExitStatus,
    },
}
