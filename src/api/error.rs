//! API Error Types
//!
//! Failures of calls to the GreenBite backend.

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Could not connect to the backend at all
    #[error("Backend unavailable at {0}")]
    Unavailable(String),

    /// The request took longer than the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The body did not have the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The call was aborted before it completed
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Classify a reqwest transport error
    pub(crate) fn transport(error: reqwest::Error, base_url: &str) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_connect() {
            ApiError::Unavailable(base_url.to_string())
        } else {
            ApiError::Request(error)
        }
    }

    /// True when the failure points at the backend not running or not reachable
    pub fn is_backend_down(&self) -> bool {
        matches!(
            self,
            ApiError::Unavailable(_) | ApiError::Timeout | ApiError::Request(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;
