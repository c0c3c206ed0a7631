//! Current-path middleware and extractor.
//!
//! [`stamp_current_path`] runs on every request and overwrites
//! `x-pathname` with the request path, so a client cannot spoof the value
//! that handlers see through [`CurrentPath`].

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::core::routing::{CURRENT_PATH_HEADER, current_path};

/// Stamp the request path into the current-path header.
pub async fn stamp_current_path(mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    match HeaderValue::from_str(&path) {
        Ok(value) => {
            request.headers_mut().insert(CURRENT_PATH_HEADER, value);
        }
        Err(_) => {
            warn!(path = %path, "Request path is not a valid header value");
            request.headers_mut().remove(CURRENT_PATH_HEADER);
        }
    }

    next.run(request).await
}

/// The current request path as stamped by [`stamp_current_path`].
///
/// Resolves to `/` when the header is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPath(pub String);

impl<S> FromRequestParts<S> for CurrentPath
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_path(&parts.headers)))
    }
}
