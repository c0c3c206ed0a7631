//! HTTP layer error types.

use thiserror::Error;

/// Result type for HTTP layer operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors that can occur while running the HTTP edge.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop stopped with an error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl HttpError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }
}
