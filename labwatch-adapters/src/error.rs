//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when collecting stats from a service.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// No credential configured for a service that requires one.
    ///
    /// Returned before any network I/O happens.
    #[error("No API token configured")]
    MissingToken,

    /// Authentication rejected by the service.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// HTTP request failed (non-2xx status).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse the response payload.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
