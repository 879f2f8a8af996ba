//! CLI command execution.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::layout::best_tile_layout;
use crate::process::{PoolLauncher, WorkUnit};

use super::args::{Cli, Commands};

/// Execute the parsed command line.
pub async fn execute(mut cli: Cli) -> Result<()> {
    match cli.command.take() {
        Some(Commands::Layout { pool_size }) => {
            let (x, y) = best_tile_layout(pool_size);
            println!(
                "{x} x {y} tiles ({} workers idle)",
                pool_size.saturating_sub(x * y)
            );
            Ok(())
        }
        None => run_batch(cli).await,
    }
}

/// Run every command from the arguments and the optional command file,
/// at most `jobs` at a time.
async fn run_batch(cli: Cli) -> Result<()> {
    let mut command_lines = cli.commands;
    if let Some(ref file) = cli.file {
        command_lines.extend(read_command_file(file)?);
    }
    if command_lines.is_empty() {
        bail!("No commands given. Pass them as arguments or via --file.");
    }

    let jobs = cli.jobs.unwrap_or_else(default_jobs);
    let total = command_lines.len();

    let units: Vec<WorkUnit> = command_lines
        .into_iter()
        .map(|line| {
            let unit = WorkUnit::shell(line);
            if cli.quiet {
                unit.silent()
            } else {
                unit
            }
        })
        .collect();

    PoolLauncher::new(jobs)
        .poll_interval(Duration::from_millis(cli.poll_interval))
        .launch(units)
        .await
        .context("Batch failed")?;

    println!("All {total} commands completed successfully.");
    Ok(())
}

/// Default pool size: one worker per available CPU.
fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Read one command per line, skipping blank lines and '#' comments.
fn read_command_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read command file: {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn batch_cli(commands: Vec<String>) -> Cli {
        Cli {
            jobs: Some(2),
            poll_interval: 10,
            file: None,
            quiet: true,
            commands,
            command: None,
        }
    }

    #[test]
    fn test_read_command_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "echo one").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# a comment").unwrap();
        writeln!(file, "  echo two  ").unwrap();

        let commands = read_command_file(file.path()).unwrap();
        assert_eq!(commands, vec!["echo one", "echo two"]);
    }

    #[test]
    fn test_read_missing_command_file() {
        let err = read_command_file(Path::new("/nonexistent/commands.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read command file"));
    }

    #[tokio::test]
    async fn test_run_batch_from_args() {
        let cli = batch_cli(vec!["echo one".into(), "echo two".into()]);
        execute(cli).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_batch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "echo from-file").unwrap();

        let mut cli = batch_cli(Vec::new());
        cli.file = Some(file.path().to_path_buf());
        execute(cli).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_batch_without_commands_fails() {
        let err = execute(batch_cli(Vec::new())).await.unwrap_err();
        assert!(err.to_string().contains("No commands given"));
    }

    #[tokio::test]
    async fn test_run_batch_reports_failure() {
        let cli = batch_cli(vec!["echo ok".into(), "exit 9".into()]);
        let err = execute(cli).await.unwrap_err();
        assert!(format!("{err:#}").contains("exit 9"));
    }

    #[tokio::test]
    async fn test_layout_subcommand() {
        let mut cli = batch_cli(Vec::new());
        cli.command = Some(Commands::Layout { pool_size: 6 });
        execute(cli).await.unwrap();
    }
}
