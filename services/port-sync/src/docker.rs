//! Container log retrieval over the Docker Engine API
//!
//! The VPN container announces its forwarded port on stdout; this module
//! pulls the trailing log lines the same way `docker logs --tail N` would.

use async_trait::async_trait;
use bollard::container::LogsOptions;
use bollard::Docker;
use futures::StreamExt;

use crate::error::Result;

/// Source of log text to scan for a forwarded port
///
/// The seam that lets the sync loop run against canned text in tests.
#[async_trait]
pub trait LogSource {
    /// Return the last `lines` log lines as one string
    async fn tail(&self, lines: usize) -> Result<String>;
}

/// Log source backed by the local Docker daemon
pub struct ContainerLogs {
    /// Docker client
    docker: Docker,

    /// Container name or id being watched
    container: String,
}

impl ContainerLogs {
    /// Connect to the local Docker daemon
    pub fn connect(container: impl Into<String>) -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;

        Ok(Self {
            docker,
            container: container.into(),
        })
    }
}

#[async_trait]
impl LogSource for ContainerLogs {
    async fn tail(&self, lines: usize) -> Result<String> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            tail: lines.to_string(),
            follow: false,
            ..Default::default()
        };

        let mut logs_stream = self.docker.logs(&self.container, Some(options));
        let mut logs = String::new();

        while let Some(log_result) = logs_stream.next().await {
            match log_result {
                Ok(log_output) => {
                    logs.push_str(&log_output.to_string());
                }
                Err(e) => {
                    tracing::warn!(
                        container = %self.container,
                        error = %e,
                        "Error reading logs from container"
                    );
                }
            }
        }

        tracing::debug!(
            container = %self.container,
            log_size = logs.len(),
            "Container logs retrieved"
        );
        Ok(logs)
    }
}
