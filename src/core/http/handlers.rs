//! Request handlers.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use tracing::{info, instrument};

use super::{middleware::CurrentPath, server::AppState};
use crate::core::routing::is_active_route;
use crate::core::security::sanitize_return_url;

/// Characters re-encoded before a sanitized path goes into `Location`.
/// Non-ASCII is always encoded by `utf8_percent_encode`.
const LOCATION_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Navigation entry with its active flag for the current page.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// What a server-rendered page needs to know about the request.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub path: String,
    pub nav: Vec<NavItem>,
}

/// Service info.
pub async fn info_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.config.server.name,
        "version": state.config.server.version,
        "endpoints": {
            "continue": format!("/continue?{}=<path>", state.config.redirect.return_param),
            "health": "/health",
            "info": "/api/info"
        }
    }))
}

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Redirect to the caller-supplied return URL if it is safe, otherwise to
/// the configured default.
#[instrument(skip_all)]
pub async fn continue_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let redirect = &state.config.redirect;
    let candidate = params.get(&redirect.return_param).map(String::as_str);

    let target = match sanitize_return_url(candidate) {
        Some(path) => path,
        None => {
            info!(
                default = %redirect.default_path,
                "Return URL rejected, using default"
            );
            redirect.default_path.clone()
        }
    };

    let location = location_value(&target)
        .or_else(|| location_value(&redirect.default_path))
        .unwrap_or_else(|| HeaderValue::from_static("/"));

    info!(location = ?location, "Redirecting");
    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
}

/// Page context for any path without a dedicated route.
pub async fn page_context(
    State(state): State<Arc<AppState>>,
    CurrentPath(path): CurrentPath,
) -> Json<PageContext> {
    let nav = state
        .config
        .navigation
        .links
        .iter()
        .map(|link| NavItem {
            label: link.label.clone(),
            href: link.href.clone(),
            active: is_active_route(&path, &link.href),
        })
        .collect();

    Json(PageContext { path, nav })
}

fn location_value(path: &str) -> Option<HeaderValue> {
    let encoded = utf8_percent_encode(path, LOCATION_ENCODE_SET).to_string();
    HeaderValue::from_str(&encoded).ok()
}
