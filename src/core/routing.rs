//! Current-path resolution for server-rendered handlers.
//!
//! The HTTP middleware stamps the request path into [`CURRENT_PATH_HEADER`];
//! handlers read it back with [`current_path`] and use [`is_active_route`]
//! to highlight navigation entries.

use http::HeaderMap;

/// Request header carrying the current request path.
pub const CURRENT_PATH_HEADER: &str = "x-pathname";

/// Resolve the current path from request headers.
///
/// Falls back to `/` when the header is missing, not visible ASCII, or not
/// an absolute path.
pub fn current_path(headers: &HeaderMap) -> String {
    headers
        .get(CURRENT_PATH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|path| path.starts_with('/'))
        .unwrap_or("/")
        .to_string()
}

/// Whether a navigation `href` should be marked active for `current`.
///
/// The root link is active only on the root page. Any other link is active
/// on its own path and on every path below it, matched by whole segments.
pub fn is_active_route(current: &str, href: &str) -> bool {
    let current = strip_trailing_slashes(current);
    let href = strip_trailing_slashes(href);

    if href == "/" {
        return current == "/";
    }

    match current.strip_prefix(href) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn strip_trailing_slashes(path: &str) -> &str {
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() { "/" } else { stripped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CURRENT_PATH_HEADER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_current_path_from_header() {
        assert_eq!(current_path(&headers_with("/pricing")), "/pricing");
    }

    #[test]
    fn test_current_path_defaults_to_root() {
        assert_eq!(current_path(&HeaderMap::new()), "/");
        assert_eq!(current_path(&headers_with("pricing")), "/");
        assert_eq!(current_path(&headers_with("")), "/");
    }

    #[test]
    fn test_current_path_ignores_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CURRENT_PATH_HEADER,
            HeaderValue::from_bytes(b"/caf\xc3\xa9").unwrap(),
        );
        assert_eq!(current_path(&headers), "/");
    }

    #[test]
    fn test_root_only_active_on_root() {
        assert!(is_active_route("/", "/"));
        assert!(!is_active_route("/pricing", "/"));
    }

    #[test]
    fn test_exact_and_nested_matches() {
        assert!(is_active_route("/pricing", "/pricing"));
        assert!(is_active_route("/categories/shoes", "/categories"));
        assert!(is_active_route("/categories/shoes/red", "/categories"));
        assert!(!is_active_route("/contact", "/categories"));
    }

    #[test]
    fn test_matches_whole_segments_only() {
        assert!(!is_active_route("/pricing-plans", "/pricing"));
        assert!(!is_active_route("/pricingx/a", "/pricing"));
    }

    #[test]
    fn test_trailing_slashes_ignored() {
        assert!(is_active_route("/pricing/", "/pricing"));
        assert!(is_active_route("/pricing", "/pricing/"));
        assert!(is_active_route("/", "//"));
    }
}
