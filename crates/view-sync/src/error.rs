//! Error types for the view sync crate.

use thiserror::Error;

/// Result type alias for view sync operations.
pub type Result<T> = std::result::Result<T, ViewSyncError>;

/// Errors that can occur while synchronizing a page region.
///
/// None of these ever leave a refresh cycle: the client maps them to a
/// [`crate::SkipReason`] and logs them.
#[derive(Debug, Error)]
pub enum ViewSyncError {
    /// HTTP client error (connection refused, aborted body, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Partial endpoint answered with a non-success status
    #[error("Partial request failed with status {status}")]
    Status { status: u16 },

    /// The realtime channel could not be set up
    #[error("Realtime channel unavailable: {0}")]
    TransportUnavailable(String),

    /// A configured or page URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ViewSyncError {
    /// Create a status error
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Create a transport unavailable error
    pub fn transport_unavailable(message: impl Into<String>) -> Self {
        Self::TransportUnavailable(message.into())
    }

    /// Create an invalid URL error
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl(message.into())
    }
}
