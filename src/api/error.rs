//! Error types for the backend client

use thiserror::Error;

/// Errors returned by backend calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response body could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend returned {status}")]
    Status { status: reqwest::StatusCode },
}
