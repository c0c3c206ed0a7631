//! Router assembly and the HTTP listener.

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{HttpError, HttpResult, handlers, middleware::stamp_current_path};
use crate::core::Config;

/// Application state shared across handlers.
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
///
/// Every request, including the page fallback, passes through
/// [`stamp_current_path`].
pub fn build_router(state: Arc<AppState>) -> Router {
    let enable_cors = state.config.http.enable_cors;

    let mut app = Router::new()
        .route("/api/info", get(handlers::info_handler))
        .route("/health", get(handlers::health_check))
        .route("/continue", get(handlers::continue_handler))
        .fallback(handlers::page_context)
        .layer(middleware::from_fn(stamp_current_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// HTTP server for the landing edge.
pub struct HttpServer {
    config: Config,
}

impl HttpServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self) -> HttpResult<()> {
        let addr = self.config.http.address();
        let cors_status = if self.config.http.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        let return_param = self.config.redirect.return_param.clone();

        let app = build_router(Arc::new(AppState::new(self.config)));

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| HttpError::bind(&addr, e))?;

        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Continue: GET /continue?{}=<path>", return_param);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(HttpError::Serve)?;

        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NavLink;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(config: Config) -> Router {
        build_router(Arc::new(AppState::new(config)))
    }

    fn app() -> Router {
        app_with(Config::default())
    }

    async fn get_response(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_continue_redirects_to_safe_path() {
        let response = get_response(app(), "/continue?returnTo=%2Fdashboard").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_continue_rejects_open_redirect() {
        for uri in [
            "/continue?returnTo=https%3A%2F%2Fevil.com",
            "/continue?returnTo=%2F%2Fevil.com%2Fphish",
            "/continue?returnTo=%2F%5Cevil.com",
            "/continue?returnTo=%2Fok%250d%250aSet-Cookie%3Aa%3Db",
            "/continue?returnTo=",
            "/continue",
        ] {
            let response = get_response(app(), uri).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(location(&response), "/", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_continue_encodes_tab_before_slash() {
        // Browsers drop tabs, so a raw "/\t/evil.com" would resolve as "//evil.com".
        let response = get_response(app(), "/continue?returnTo=%2F%09%2Fevil.com").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/%09/evil.com");
    }

    #[tokio::test]
    async fn test_continue_uses_configured_default_and_param() {
        let mut config = Config::default();
        config.redirect.default_path = "/welcome".to_string();
        config.redirect.return_param = "next".to_string();

        let response = get_response(app_with(config.clone()), "/continue?next=%2F%2Fevil.com").await;
        assert_eq!(location(&response), "/welcome");

        let response = get_response(app_with(config), "/continue?returnTo=%2Faccount").await;
        assert_eq!(location(&response), "/welcome");
    }

    #[tokio::test]
    async fn test_continue_reencodes_decoded_path() {
        // Query decoding yields "/a%20b", the sanitizer decodes again to "/a b".
        let response = get_response(app(), "/continue?returnTo=%2Fa%2520b").await;
        assert_eq!(location(&response), "/a%20b");
    }

    #[tokio::test]
    async fn test_page_context_marks_active_links() {
        let response = get_response(app(), "/categories/shoes").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["path"], "/categories/shoes");

        let active: Vec<&str> = body["nav"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|item| item["active"] == true)
            .map(|item| item["href"].as_str().unwrap())
            .collect();
        assert_eq!(active, vec!["/categories"]);
    }

    #[tokio::test]
    async fn test_page_context_on_root() {
        let mut config = Config::default();
        config.navigation.links = vec![NavLink {
            label: "Home".to_string(),
            href: "/".to_string(),
        }];

        let body = json_body(get_response(app_with(config), "/").await).await;
        assert_eq!(body["path"], "/");
        assert_eq!(body["nav"][0]["active"], true);
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let body = json_body(get_response(app(), "/health").await).await;
        assert_eq!(body["status"], "healthy");

        let body = json_body(get_response(app(), "/api/info").await).await;
        assert_eq!(body["name"], "landing-edge");
        assert_eq!(body["endpoints"]["health"], "/health");
    }

    #[tokio::test]
    async fn test_cors_layer_when_enabled() {
        let mut config = Config::default();
        config.http.enable_cors = true;

        let response = app_with(config)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
