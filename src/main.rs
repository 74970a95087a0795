use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use waypoint::config::Config;
use waypoint::server;

/// Minimal forwarding HTTP proxy.
#[derive(Debug, Parser)]
#[command(name = "waypoint", version)]
struct Cli {
    /// Port to listen on (all interfaces). Overrides the configured address.
    port: Option<u16>,

    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append access log lines to this file.
    #[arg(long)]
    access_log: Option<PathBuf>,

    /// Give up connecting to an origin after this many milliseconds.
    #[arg(long)]
    connect_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };
    if let Some(port) = cli.port {
        cfg.listen_addr = format!("0.0.0.0:{}", port);
    }
    if cli.access_log.is_some() {
        cfg.access_log = cli.access_log;
    }
    if cli.connect_timeout_ms.is_some() {
        cfg.connect_timeout_ms = cli.connect_timeout_ms;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter)),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
