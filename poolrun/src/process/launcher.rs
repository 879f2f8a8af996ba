//! Bounded-concurrency launcher for a batch of worker processes.

use std::time::Duration;

use crate::error::LaunchError;

use super::unit::WorkUnit;
use super::watch::{ProcessState, WatchedProcess};

/// Default throttle between polling passes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs a batch of [`WorkUnit`]s to completion while keeping at most
/// `pool_size` of them running at any one time.
///
/// The launcher drives everything from a single control task: a
/// non-blocking polling loop detects completions and admits waiting
/// units in submission order, then a drain phase joins whatever is
/// still running. Parallelism lives entirely in the spawned OS
/// processes.
///
/// # Example
///
/// ```rust,no_run
/// use poolrun::{PoolLauncher, WorkUnit};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let units = vec![
///         WorkUnit::shell("gzip a.log"),
///         WorkUnit::shell("gzip b.log"),
///         WorkUnit::shell("gzip c.log"),
///     ];
///
///     // At most 2 gzips run at once.
///     PoolLauncher::new(2).launch(units).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PoolLauncher {
    pool_size: usize,
    poll_interval: Duration,
}

impl PoolLauncher {
    /// Create a launcher with the given concurrency limit.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the throttle between polling passes.
    ///
    /// The interval also gives just-started children time to register
    /// with the OS before the next liveness check.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Start every unit, never exceeding the pool size, and block until
    /// all have finished.
    ///
    /// Admission follows submission order: when capacity frees up, the
    /// earliest-submitted waiting unit starts first. Once started, a
    /// unit always runs to completion; a failure does not cancel its
    /// siblings, and there are no timeouts.
    ///
    /// Returns `Ok(())` when every unit exits successfully. Otherwise
    /// returns [`LaunchError::WorkerFailed`] for the first unit in
    /// submission order whose exit status indicates failure; statuses
    /// of any other failed units are not surfaced (a deliberate
    /// simplification).
    ///
    /// # Errors
    ///
    /// Fails fatally on a zero pool size, on spawn/poll/wait OS errors,
    /// or if a dead child yields no exit status.
    pub async fn launch(&self, units: Vec<WorkUnit>) -> Result<(), LaunchError> {
        if self.pool_size < 1 {
            return Err(LaunchError::InvalidPoolSize(self.pool_size));
        }
        if units.is_empty() {
            return Ok(());
        }

        let total = units.len();
        let mut procs: Vec<WatchedProcess> = units.into_iter().map(WatchedProcess::new).collect();

        // Admission loop: runs until every unit has been started at
        // least once, keeping at most pool_size running.
        loop {
            // Detect completions among the started units.
            for proc in &mut procs {
                if proc.state() == ProcessState::Started && !proc.is_alive()? {
                    proc.mark_finished()?;
                }
            }

            let running = count_in(&procs, ProcessState::Started);
            let waiting = count_in(&procs, ProcessState::NotStarted);
            if waiting == 0 {
                // Everything has been started at least once; go drain.
                break;
            }

            let available = self.pool_size.saturating_sub(running);
            if available > 0 {
                let mut started_now = 0;
                for proc in &mut procs {
                    if started_now == available.min(waiting) {
                        break;
                    }
                    if proc.state() == ProcessState::NotStarted {
                        proc.start()?;
                        started_now += 1;
                    }
                }
                tracing::debug!(
                    admitted = started_now,
                    running = running + started_now,
                    pool_size = self.pool_size,
                    "admitted workers"
                );
            }

            // Tame loop activity; also required so a just-started child
            // registers as alive before the next liveness check.
            tokio::time::sleep(self.poll_interval).await;
        }

        // Join barrier: wait for whatever is still running, in
        // submission order. Each join blocks only on its own unit.
        tracing::debug!(total, "all workers admitted, draining");
        for proc in &mut procs {
            proc.join().await?;
        }

        // Check all exit statuses before returning, reporting the first
        // failure in submission order.
        for proc in &procs {
            let status = proc
                .exit_status()
                .ok_or_else(|| LaunchError::MissingExitStatus(proc.name().to_string()))?;
            if !status.success() {
                return Err(LaunchError::WorkerFailed {
                    name: proc.name().to_string(),
                    status,
                });
            }
        }

        Ok(())
    }
}

fn count_in(procs: &[WatchedProcess], state: ProcessState) -> usize {
    procs.iter().filter(|p| p.state() == state).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn fast_launcher(pool_size: usize) -> PoolLauncher {
        PoolLauncher::new(pool_size).poll_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_empty_batch_is_success() {
        fast_launcher(2).launch(Vec::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_pool_size_is_an_error() {
        let err = fast_launcher(0)
            .launch(vec![WorkUnit::shell("exit 0")])
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::InvalidPoolSize(0)));
    }

    #[tokio::test]
    async fn test_all_success() {
        let units = vec![
            WorkUnit::shell("exit 0"),
            WorkUnit::shell("sleep 0.05"),
            WorkUnit::shell("true"),
        ];
        fast_launcher(2).launch(units).await.unwrap();
    }

    #[tokio::test]
    async fn test_pool_larger_than_batch() {
        let units = vec![
            WorkUnit::shell("exit 0"),
            WorkUnit::shell("exit 0"),
            WorkUnit::shell("exit 0"),
        ];
        fast_launcher(8).launch(units).await.unwrap();
    }

    #[tokio::test]
    async fn test_reports_first_failure_in_submission_order() {
        // B fails fast, C succeeds slowly; the failure must cite B even
        // though C is still running when B dies.
        let units = vec![
            WorkUnit::shell("exit 0").label("a"),
            WorkUnit::shell("exit 3").label("b"),
            WorkUnit::shell("sleep 0.3").label("c"),
        ];

        let err = fast_launcher(2).launch(units).await.unwrap_err();
        match err {
            LaunchError::WorkerFailed { name, status } => {
                assert_eq!(name, "b");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_earliest_failure_wins_regardless_of_finish_order() {
        // The second unit fails first in real time, but the first unit
        // (which fails later) is the one reported.
        let units = vec![
            WorkUnit::shell("sleep 0.3; exit 1").label("slow-fail"),
            WorkUnit::shell("exit 2").label("fast-fail"),
        ];

        let err = fast_launcher(2).launch(units).await.unwrap_err();
        match err {
            LaunchError::WorkerFailed { name, status } => {
                assert_eq!(name, "slow-fail");
                assert_eq!(status.code(), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_pool_of_one_runs_sequentially() {
        let units = vec![
            WorkUnit::shell("sleep 0.1"),
            WorkUnit::shell("sleep 0.1"),
            WorkUnit::shell("sleep 0.1"),
        ];

        let start = Instant::now();
        fast_launcher(1).launch(units).await.unwrap();
        let elapsed = start.elapsed();

        // Strictly sequential: three 100ms sleeps, never two at once.
        assert!(elapsed >= Duration::from_millis(280)); // Allow some slack
    }

    #[tokio::test]
    async fn test_pool_admits_in_parallel() {
        let units = vec![
            WorkUnit::shell("sleep 0.2"),
            WorkUnit::shell("sleep 0.2"),
            WorkUnit::shell("sleep 0.2"),
        ];

        let start = Instant::now();
        fast_launcher(3).launch(units).await.unwrap();
        let elapsed = start.elapsed();

        // All three should run concurrently, so well under the 600ms a
        // sequential run would take.
        assert!(elapsed < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_spawn_failure_surfaces() {
        let units = vec![WorkUnit::new("nonexistent_command_12345")];
        let err = fast_launcher(1).launch(units).await.unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }
}
