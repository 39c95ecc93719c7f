//! Transport-level errors behind the query service seam.

use thiserror::Error;

/// Result type for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors a query service implementation can surface.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never completed (connectivity, timeout, cancellation).
    #[error("service request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}
