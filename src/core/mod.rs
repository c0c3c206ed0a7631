//! Core module containing the request-safety building blocks.
//!
//! `security` and `routing` are pure and always compiled; the `http` edge
//! that wires them into an axum router is behind the `http` feature.

pub mod config;
pub mod error;
pub mod routing;
pub mod security;

#[cfg(feature = "http")]
pub mod http;

pub use config::Config;
pub use error::{Error, Result};
pub use routing::{CURRENT_PATH_HEADER, current_path, is_active_route};
pub use security::{ReturnPath, resolve_return_url, sanitize_return_url};

#[cfg(feature = "http")]
pub use http::HttpServer;
