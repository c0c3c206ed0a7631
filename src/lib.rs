//! Request-safety edge for a marketing site.
//!
//! # Architecture
//!
//! - **core::security**: return-URL sanitizing against open redirects
//! - **core::routing**: current-path resolution and active-route matching
//! - **core::http**: axum middleware stamping `x-pathname`, plus the
//!   redirect and page-context handlers (feature `http`)
//! - **core::config** / **core::error**: environment config and error types
//!
//! # Example
//!
//! ```rust
//! use landing_edge::{is_active_route, sanitize_return_url};
//!
//! let target = sanitize_return_url(Some("/pricing")).unwrap_or_else(|| "/".to_string());
//! assert_eq!(target, "/pricing");
//! assert!(is_active_route("/pricing/pro", "/pricing"));
//! ```

pub mod core;

// Re-export commonly used types for convenience
pub use self::core::{
    Config, Error, Result, ReturnPath, current_path, is_active_route, resolve_return_url,
    sanitize_return_url,
};

/// Validate `config` and serve the HTTP edge until shutdown.
#[cfg(feature = "http")]
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;
    crate::core::HttpServer::new(config).run().await?;
    Ok(())
}
