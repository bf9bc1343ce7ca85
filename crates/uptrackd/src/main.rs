//! uptrackd: the uptrack daemon.
//!
//! Single binary that assembles the availability monitor:
//! - Endpoint config (YAML)
//! - HTTP prober
//! - Cycle engine + cumulative availability ledger
//! - Console reporting
//! - Signal-based shutdown
//!
//! # Usage
//!
//! ```text
//! uptrackd watch --endpoints endpoints.yaml
//! uptrackd check --endpoints endpoints.yaml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};

use uptrack_monitor::{ConsoleSink, Monitor};
use uptrack_probe::Prober;

#[derive(Parser)]
#[command(name = "uptrackd", about = "uptrack availability monitor daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe endpoints on a fixed interval until interrupted.
    Watch {
        /// Path to the YAML endpoints file.
        #[arg(long)]
        endpoints: PathBuf,

        /// Per-request timeout in seconds.
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Cycle interval in seconds; defaults to the timeout.
        #[arg(long)]
        interval: Option<u64>,

        /// Latency bound in milliseconds for counting a response as up.
        #[arg(long, default_value = "500")]
        latency_threshold_ms: u64,
    },

    /// Run a single cycle, print the report, and exit.
    Check {
        /// Path to the YAML endpoints file.
        #[arg(long)]
        endpoints: PathBuf,

        /// Per-request timeout in seconds.
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Latency bound in milliseconds for counting a response as up.
        #[arg(long, default_value = "500")]
        latency_threshold_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,uptrackd=debug,uptrack_monitor=debug,uptrack_probe=debug,uptrack_config=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Watch {
            endpoints,
            timeout,
            interval,
            latency_threshold_ms,
        } => {
            let timeout = Duration::from_secs(timeout);
            let interval = interval.map(Duration::from_secs).unwrap_or(timeout);
            run_watch(
                endpoints,
                timeout,
                interval,
                Duration::from_millis(latency_threshold_ms),
            )
            .await
        }
        Command::Check {
            endpoints,
            timeout,
            latency_threshold_ms,
        } => {
            run_check(
                endpoints,
                Duration::from_secs(timeout),
                Duration::from_millis(latency_threshold_ms),
            )
            .await
        }
    }
}

async fn run_watch(
    path: PathBuf,
    timeout: Duration,
    interval: Duration,
    latency_threshold: Duration,
) -> anyhow::Result<()> {
    info!("uptrack monitor starting");

    let endpoints = uptrack_config::load_endpoints(&path)?;
    info!(count = endpoints.len(), path = %path.display(), "endpoints loaded");
    if endpoints.is_empty() {
        warn!("endpoints file lists nothing to probe; cycles will be empty");
    }

    let prober = Prober::new(timeout, latency_threshold)?;
    let monitor = Monitor::new(prober, endpoints, interval, Box::new(ConsoleSink));
    info!(
        timeout_secs = timeout.as_secs(),
        interval_secs = interval.as_secs(),
        latency_threshold_ms = latency_threshold.as_millis() as u64,
        "monitor initialized"
    );

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);

    let _ = monitor_handle.await;

    info!("uptrack monitor stopped");
    Ok(())
}

async fn run_check(
    path: PathBuf,
    timeout: Duration,
    latency_threshold: Duration,
) -> anyhow::Result<()> {
    let endpoints = uptrack_config::load_endpoints(&path)?;
    info!(count = endpoints.len(), path = %path.display(), "endpoints loaded");

    let prober = Prober::new(timeout, latency_threshold)?;
    // One-shot: the interval only shows up in the report header.
    let mut monitor = Monitor::new(prober, endpoints, timeout, Box::new(ConsoleSink));
    let stats = monitor.run_once().await;

    info!(up = stats.up, down = stats.down, "check finished");
    Ok(())
}
