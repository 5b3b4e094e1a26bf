//! Error types for the WebUI client

use thiserror::Error;

/// Result type alias for WebUI client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the WebUI client
#[derive(Debug, Error)]
pub enum Error {
    /// Base URL failed validation
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The WebUI rejected the supplied credentials
    #[error("Authentication rejected by the WebUI")]
    AuthRejected,

    /// An endpoint answered with a status the client does not expect
    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// API endpoint path suffix (e.g. "auth/login")
        endpoint: &'static str,
        /// HTTP status the endpoint returned
        status: reqwest::StatusCode,
    },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
