//! Validation for untrusted values that end up in redirects.
//!
//! Everything here is pure and independent of the HTTP stack, so handlers,
//! background jobs and tests can share the same checks.

pub mod return_url;

pub use return_url::{
    DecodeError, MAX_RETURN_URL_LEN, ReturnPath, resolve_return_url, sanitize_return_url,
};
