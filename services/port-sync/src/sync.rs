//! Reconcile loop
//!
//! One remembered port, one fixed-interval loop. Each divergent cycle does
//! login → read preferences → conditional setPreferences; any failure
//! aborts the cycle and the next tick retries from scratch.

use std::time::Duration;

use portsync_qbit::QbitClient;
use tokio::sync::watch;
use tokio::time::interval;

use crate::docker::LogSource;
use crate::error::Result;
use crate::extract;

/// Result of one reconcile cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The container has not announced a forwarded port yet
    NoForwardedPort,

    /// The announced port matches the last one pushed; no WebUI traffic
    Unchanged(u16),

    /// qBittorrent already listens on the announced port
    AlreadyCorrect(u16),

    /// qBittorrent's listening port was updated
    Updated {
        /// Port qBittorrent listened on before the update
        previous: u16,
        /// Newly announced forwarded port
        port: u16,
    },
}

/// Reconciles the forwarded port announced in container logs with
/// qBittorrent's configured listening port
pub struct SyncService<S> {
    /// WebUI client
    qbit: QbitClient,

    /// Where log text comes from
    logs: S,

    /// Trailing log lines scanned per cycle
    tail_lines: usize,

    /// Last port confirmed or pushed to qBittorrent
    last_port: Option<u16>,
}

impl<S: LogSource> SyncService<S> {
    /// Create a new sync service
    pub fn new(qbit: QbitClient, logs: S, tail_lines: usize) -> Self {
        Self {
            qbit,
            logs,
            tail_lines,
            last_port: None,
        }
    }

    /// Last port confirmed or pushed to qBittorrent
    pub fn last_port(&self) -> Option<u16> {
        self.last_port
    }

    /// Run one reconcile cycle
    ///
    /// `last_port` only advances once the remote state is confirmed or
    /// updated, so a failed cycle is retried in full on the next tick.
    pub async fn sync_once(&mut self) -> Result<SyncOutcome> {
        let text = self.logs.tail(self.tail_lines).await?;

        let Some(port) = extract::forwarded_port(&text) else {
            return Ok(SyncOutcome::NoForwardedPort);
        };

        if self.last_port == Some(port) {
            return Ok(SyncOutcome::Unchanged(port));
        }

        self.qbit.login().await?;
        let prefs = self.qbit.preferences().await?;

        if prefs.listen_port == port {
            self.last_port = Some(port);
            return Ok(SyncOutcome::AlreadyCorrect(port));
        }

        self.qbit.set_listen_port(port).await?;
        self.last_port = Some(port);

        Ok(SyncOutcome::Updated {
            previous: prefs.listen_port,
            port,
        })
    }

    /// Run the reconcile loop until `shutdown` flips to true
    ///
    /// A failed cycle is logged and the loop sleeps until the next tick.
    /// The interval is fixed; there is no backoff.
    pub async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(period = ?period, "Starting port sync loop");

        let mut timer = interval(period);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    match self.sync_once().await {
                        Ok(outcome) => log_outcome(&outcome),
                        Err(e) => {
                            tracing::warn!(error = %e, "Sync cycle failed, retrying next tick");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Shutting down port sync loop");
                        break;
                    }
                }
            }
        }
    }
}

fn log_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::NoForwardedPort => {
            tracing::info!("Waiting for the VPN to announce a forwarded port");
        }
        SyncOutcome::Unchanged(port) => {
            tracing::debug!(port = port, "Forwarded port unchanged");
        }
        SyncOutcome::AlreadyCorrect(port) => {
            tracing::info!(port = port, "qBittorrent already listening on forwarded port");
        }
        SyncOutcome::Updated { previous, port } => {
            tracing::info!(
                previous = previous,
                port = port,
                "Updated qBittorrent listening port"
            );
        }
    }
}
