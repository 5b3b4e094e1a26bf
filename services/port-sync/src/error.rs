//! Error types for the reconciler

use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the reconciler
#[derive(Debug, Error)]
pub enum Error {
    /// Docker daemon connection or log retrieval failure
    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    /// WebUI call failure
    #[error("qBittorrent WebUI error: {0}")]
    WebUi(#[from] portsync_qbit::Error),
}
