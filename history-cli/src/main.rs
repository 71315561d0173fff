//! Binary crate for the `weather-history` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive dashboard and configuration prompts
//! - Human-friendly rendering of statistics, charts and tables

use clap::Parser;
use tracing_subscriber::EnvFilter;

use history_cli::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the rendered dashboard; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
