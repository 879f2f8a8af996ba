//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Poolrun - run batches of shell commands with bounded concurrency
#[derive(Parser, Debug)]
#[command(name = "poolrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Maximum number of commands running at once (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Throttle between polling passes, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub poll_interval: u64,

    /// File with one command per line (blank lines and '#' comments skipped)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Discard worker stdout/stderr instead of inheriting the terminal
    #[arg(short, long)]
    pub quiet: bool,

    /// Commands to run (each argument is one shell command)
    #[arg(trailing_var_arg = true)]
    pub commands: Vec<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the best tile grid for splitting work across a pool
    Layout {
        /// Number of workers that can run at once
        pool_size: usize,
    },
}
