//! Poolrun - run batches of shell commands with bounded concurrency.
//!
//! Thin entry point: initialise logging, parse arguments, dispatch.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use poolrun::cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    execute(Cli::parse()).await
}
