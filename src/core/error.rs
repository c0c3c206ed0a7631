//! Error types and handling for the landing edge.
//!
//! Return-URL validation has no error surface of its own; failures here come
//! from configuration, I/O, and the HTTP listener.

use thiserror::Error;

/// A specialized Result type for landing edge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the HTTP layer.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] crate::core::http::HttpError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
