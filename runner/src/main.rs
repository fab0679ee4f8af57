//! `sawrap` entry point.
//!
//! Exercises an external launchd-style supervisor with a throwaway
//! socket-activation wrapper manifest: write `sa-wrapper.json`, load
//! it, wait, print it back, delete it. Exits 0 only when the whole
//! sequence completed.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sawrap_runner::runner::{self, RunOptions};
use sawrap_runner::supervisor::DEFAULT_SUPERVISOR;

#[derive(Debug, Parser)]
#[command(name = "sawrap", version, about = "Load a test wrapper manifest into a supervisor")]
struct Cli {
    /// Path to the supervisor control binary.
    #[arg(long = "supervisor", default_value = DEFAULT_SUPERVISOR)]
    supervisor: PathBuf,

    /// Seconds to wait after the load call before printing the manifest.
    #[arg(long = "wait-secs", default_value = "2")]
    wait_secs: u64,

    /// Directory to run in (defaults to the current directory).
    #[arg(long = "cwd", short = 'C')]
    cwd: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let opts = RunOptions {
        supervisor: cli.supervisor,
        wait: Duration::from_secs(cli.wait_secs),
        dir: cli.cwd,
    };

    runner::run(&opts).await?;
    Ok(())
}
