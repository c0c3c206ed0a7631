//! Configuration management for the landing edge.
//!
//! This module provides a centralized configuration structure populated from
//! defaults and `LANDING_*` environment variables (optionally via `.env`).

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{Error, Result};
use super::security::sanitize_return_url;

/// Main configuration structure.
///
/// Organized by concern; every section has a usable default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub http: HttpConfig,

    /// Post-action redirect behavior.
    pub redirect: RedirectConfig,

    /// Site navigation used for active-route marking.
    pub navigation: NavigationConfig,
}

/// Service identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name reported by the info endpoint.
    pub name: String,

    /// The version of the service.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable a permissive CORS layer.
    #[serde(default)]
    pub enable_cors: bool,
}

/// Redirect configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Where to send users when the supplied return URL is rejected.
    /// Always a sanitized relative path.
    pub default_path: String,

    /// Query parameter carrying the return URL.
    pub return_param: String,
}

/// A single navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// Navigation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub links: Vec<NavLink>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            enable_cors: false,
        }
    }
}

impl HttpConfig {
    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            default_path: "/".to_string(),
            return_param: "returnTo".to_string(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let links = [
            ("Home", "/"),
            ("Pricing", "/pricing"),
            ("Categories", "/categories"),
            ("Contact", "/contact"),
        ]
        .into_iter()
        .map(|(label, href)| NavLink {
            label: label.to_string(),
            href: href.to_string(),
        })
        .collect();

        Self { links }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "landing-edge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            http: HttpConfig::default(),
            redirect: RedirectConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Variables are prefixed with `LANDING_`, for example
    /// `LANDING_HTTP_PORT` or `LANDING_DEFAULT_REDIRECT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("LANDING_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("LANDING_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(host) = std::env::var("LANDING_HTTP_HOST") {
            config.http.host = host;
        }

        if let Ok(port) = std::env::var("LANDING_HTTP_PORT") {
            match port.parse() {
                Ok(port) => config.http.port = port,
                Err(_) => warn!("Ignoring invalid LANDING_HTTP_PORT: {}", port),
            }
        }

        if let Ok(cors) = std::env::var("LANDING_HTTP_CORS") {
            config.http.enable_cors = cors.to_lowercase() == "true" || cors == "1";
        }

        if let Ok(path) = std::env::var("LANDING_DEFAULT_REDIRECT") {
            config.redirect.default_path = path;
        }
        config.redirect.default_path = safe_default_path(&config.redirect.default_path);

        if let Ok(param) = std::env::var("LANDING_RETURN_PARAM") {
            if param.trim().is_empty() {
                warn!("LANDING_RETURN_PARAM is empty, keeping 'returnTo'");
            } else {
                config.redirect.return_param = param.trim().to_string();
            }
        }

        if let Ok(links) = std::env::var("LANDING_NAV_LINKS") {
            config.navigation.links = parse_nav_links(&links);
            info!("Loaded {} navigation links", config.navigation.links.len());
        }

        config
    }

    /// Check invariants that `from_env` cannot repair on its own.
    pub fn validate(&self) -> Result<()> {
        if self.http.host.trim().is_empty() {
            return Err(Error::config("HTTP host must not be empty"));
        }

        if self.redirect.return_param.trim().is_empty() {
            return Err(Error::config("Return URL parameter name must not be empty"));
        }

        if sanitize_return_url(Some(&self.redirect.default_path)).as_deref()
            != Some(self.redirect.default_path.as_str())
        {
            return Err(Error::config(format!(
                "Default redirect {:?} is not a safe relative path",
                self.redirect.default_path
            )));
        }

        Ok(())
    }
}

/// Upper bound on decode passes when normalizing the default redirect.
const MAX_NORMALIZE_PASSES: usize = 8;

/// The fallback redirect target must pass the same checks as user input.
///
/// Sanitizing is repeated until the value stops changing, so a
/// double-encoded path still satisfies [`Config::validate`].
fn safe_default_path(candidate: &str) -> String {
    let mut current = candidate.to_string();
    for _ in 0..MAX_NORMALIZE_PASSES {
        match sanitize_return_url(Some(&current)) {
            Some(path) if path == current => return path,
            Some(path) => current = path,
            None => break,
        }
    }

    warn!(
        "Default redirect {:?} is not a safe relative path, using '/'",
        candidate
    );
    "/".to_string()
}

/// Parse `Label=/href,Other=/other` into navigation links.
///
/// Entries without `=`, with an empty label, or with an href that is not a
/// relative path are skipped.
pub fn parse_nav_links(raw: &str) -> Vec<NavLink> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = entry.split_once('=').and_then(|(label, href)| {
                let (label, href) = (label.trim(), href.trim());
                let relative = href.starts_with('/') && !href.starts_with("//");
                (!label.is_empty() && relative).then(|| NavLink {
                    label: label.to_string(),
                    href: href.to_string(),
                })
            });
            if parsed.is_none() {
                warn!("Skipping malformed navigation entry: {}", entry);
            }
            parsed
        })
        .collect()
}
