//! Lifecycle tracking for a single worker process.

use std::process::ExitStatus;
use std::time::{Duration, Instant};

use tokio::process::Child;

use crate::error::LaunchError;

use super::unit::WorkUnit;

/// Lifecycle state of a watched process. States only advance forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcessState {
    /// Not yet admitted by the launcher.
    NotStarted,
    /// Spawned and (as far as the last poll knew) running.
    Started,
    /// Observed to have exited; exit status recorded.
    Finished,
}

/// A minimal wrapper around one worker process so the launcher can
/// track its state and elapsed time.
///
/// The wrapper owns the child handle exclusively. State is mutated only
/// by the launcher that owns the pool; there is exactly one mutator.
#[derive(Debug)]
pub struct WatchedProcess {
    unit: WorkUnit,
    child: Option<Child>,
    state: ProcessState,
    started_at: Option<Instant>,
    exit_status: Option<ExitStatus>,
}

impl WatchedProcess {
    /// Wrap a not-yet-started unit.
    pub fn new(unit: WorkUnit) -> Self {
        Self {
            unit,
            child: None,
            state: ProcessState::NotStarted,
            started_at: None,
            exit_status: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Label identifying this process in logs and errors.
    pub fn name(&self) -> &str {
        self.unit.display_label()
    }

    /// Exit status, readable only once the process is `Finished`.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        if self.state == ProcessState::Finished {
            self.exit_status
        } else {
            None
        }
    }

    /// Spawn the underlying process and transition to `Started`.
    ///
    /// Returns without blocking on the child. Calling this on a process
    /// that is not `NotStarted` is a caller bug.
    pub fn start(&mut self) -> Result<(), LaunchError> {
        if self.state != ProcessState::NotStarted {
            return Err(LaunchError::AlreadyStarted(self.name().to_string()));
        }

        let child = self.unit.command().spawn().map_err(|source| LaunchError::Spawn {
            name: self.name().to_string(),
            source,
        })?;

        self.child = Some(child);
        self.started_at = Some(Instant::now());
        self.state = ProcessState::Started;
        tracing::debug!(name = %self.name(), "started worker");
        Ok(())
    }

    /// Non-blocking liveness poll.
    ///
    /// Only meaningful once started. When the child has exited, the exit
    /// status is captured internally and `false` is returned; the state
    /// transition happens in the launcher's detection step via
    /// [`Self::mark_finished`]. A `Finished` process reports `false`
    /// without re-evaluating anything.
    pub fn is_alive(&mut self) -> Result<bool, LaunchError> {
        match self.state {
            ProcessState::NotStarted => Err(LaunchError::NotStarted(self.name().to_string())),
            ProcessState::Finished => Ok(false),
            ProcessState::Started => {
                let name = self.name().to_string();
                let Some(child) = self.child.as_mut() else {
                    return Err(LaunchError::MissingExitStatus(name));
                };
                match child.try_wait() {
                    Ok(Some(status)) => {
                        self.exit_status = Some(status);
                        Ok(false)
                    }
                    Ok(None) => Ok(true),
                    Err(source) => Err(LaunchError::Poll { name, source }),
                }
            }
        }
    }

    /// Transition a process whose exit has been observed to `Finished`.
    ///
    /// A dead child without a retrievable exit status violates the
    /// process contract and is a fatal internal error.
    pub(crate) fn mark_finished(&mut self) -> Result<(), LaunchError> {
        if self.state == ProcessState::NotStarted {
            return Err(LaunchError::NotStarted(self.name().to_string()));
        }
        if self.exit_status.is_none() {
            return Err(LaunchError::MissingExitStatus(self.name().to_string()));
        }
        self.finish();
        Ok(())
    }

    /// Block until the underlying process exits, then transition to
    /// `Finished`. Joining an already-finished process returns
    /// immediately; joining before `start()` is a caller bug.
    pub async fn join(&mut self) -> Result<(), LaunchError> {
        match self.state {
            ProcessState::NotStarted => Err(LaunchError::NotStarted(self.name().to_string())),
            ProcessState::Finished => Ok(()),
            ProcessState::Started => {
                if self.exit_status.is_none() {
                    let name = self.name().to_string();
                    let Some(child) = self.child.as_mut() else {
                        return Err(LaunchError::MissingExitStatus(name));
                    };
                    let status = child
                        .wait()
                        .await
                        .map_err(|source| LaunchError::Wait { name, source })?;
                    self.exit_status = Some(status);
                }
                self.finish();
                Ok(())
            }
        }
    }

    /// Wall-clock time since `start()` was called. Valid at any point
    /// after starting, including after `Finished`.
    pub fn elapsed(&self) -> Result<Duration, LaunchError> {
        self.started_at
            .map(|started_at| started_at.elapsed())
            .ok_or_else(|| LaunchError::NotStarted(self.name().to_string()))
    }

    fn finish(&mut self) {
        self.state = ProcessState::Finished;
        if let Some(started_at) = self.started_at {
            tracing::debug!(
                name = %self.name(),
                elapsed = ?started_at.elapsed(),
                status = ?self.exit_status,
                "worker finished"
            );
        }
    }
}
