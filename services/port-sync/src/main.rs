//! Port sync daemon binary
//!
//! Watches a VPN container's logs for the assigned forwarded port and
//! keeps qBittorrent's listening port in sync with it.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (WebUI on localhost:8080, container "transmission-openvpn")
//! port-sync
//!
//! # Point at a config file and run a single reconcile cycle
//! port-sync --config /etc/port-sync.toml --once
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portsync_daemon::config::Config;
use portsync_daemon::docker::ContainerLogs;
use portsync_daemon::sync::SyncService;
use portsync_qbit::{Credentials, QbitClient};

/// VPN forwarded-port → qBittorrent reconciler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file (environment variables fill the gaps)
    #[arg(short, long, env = "PORT_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Run a single reconcile cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    tracing::info!(
        qbittorrent = %config.qbittorrent.base_url(),
        container = %config.container.name,
        interval_seconds = config.sync.interval_seconds,
        "Starting port sync service"
    );

    let qbit = QbitClient::new(
        config.qbittorrent.base_url(),
        Credentials::new(&config.qbittorrent.username, &config.qbittorrent.password),
        Duration::from_secs(config.qbittorrent.timeout_seconds),
    )?;
    let logs = ContainerLogs::connect(&config.container.name)?;
    let mut service = SyncService::new(qbit, logs, config.container.tail_lines);

    if args.once {
        let outcome = service.sync_once().await?;
        tracing::info!(outcome = ?outcome, "Single reconcile cycle complete");
        return Ok(());
    }

    // Feed SIGINT/SIGTERM into the loop's shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping sync loop");
        let _ = shutdown_tx.send(true);
    });

    service
        .run(
            Duration::from_secs(config.sync.interval_seconds),
            shutdown_rx,
        )
        .await;

    tracing::info!("Port sync service shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
