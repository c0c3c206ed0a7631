//! HTTP edge for the landing site.
//!
//! - **middleware**: stamps the request path into `x-pathname`
//! - **handlers**: redirect continuation, page context, info and health
//! - **server**: router assembly and the listener loop
//!
//! Compiled only with the `http` feature.

mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::{HttpError, HttpResult};
pub use middleware::{CurrentPath, stamp_current_path};
pub use server::{AppState, HttpServer, build_router};
