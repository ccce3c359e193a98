//! Routing rules for the gateway's HTTP surface.
//!
//! ```text
//! GET  /             → entry document
//! GET  /static/*     → primary asset root, then fallback root
//! ANY  /api, /api/*  → analysis service, path remainder and query unchanged
//! ```

/// Path prefix forwarded to the analysis service.
pub const API_PREFIX: &str = "/api";

/// Path prefix served from the static asset roots.
pub const STATIC_PREFIX: &str = "/static";

/// Headers that describe a single connection rather than the message, and so
/// must not be copied across a proxy hop (RFC 9110 §7.6.1).
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Returns the part of `path` after the `/api` prefix.
///
/// `/api` itself yields `""`; `/api/parse` yields `"/parse"`.  Paths that
/// merely start with the same letters (`/apiary`) are not under the prefix.
pub fn api_remainder(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(API_PREFIX)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Builds the analysis-service URL for a request to `path?query`.
///
/// Returns `None` when `path` is not under `/api`.
pub fn upstream_url(base: &str, path: &str, query: Option<&str>) -> Option<String> {
    let rest = api_remainder(path)?;
    let mut url = String::with_capacity(base.len() + rest.len() + 16);
    url.push_str(base.trim_end_matches('/'));
    url.push_str(rest);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(q);
    }
    Some(url)
}

/// `true` for headers that must be dropped when forwarding.
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_remainder_of_bare_prefix_is_empty() {
        assert_eq!(api_remainder("/api"), Some(""));
    }

    #[test]
    fn test_api_remainder_keeps_leading_slash() {
        assert_eq!(api_remainder("/api/parse"), Some("/parse"));
        assert_eq!(api_remainder("/api/report/42"), Some("/report/42"));
    }

    #[test]
    fn test_api_remainder_rejects_lookalike_prefix() {
        assert_eq!(api_remainder("/apiary"), None);
    }

    #[test]
    fn test_api_remainder_rejects_other_paths() {
        assert_eq!(api_remainder("/static/app.js"), None);
        assert_eq!(api_remainder("/"), None);
    }

    #[test]
    fn test_upstream_url_appends_remainder() {
        // Arrange
        let base = "http://127.0.0.1:3001/api";

        // Act
        let url = upstream_url(base, "/api/parse", None);

        // Assert
        assert_eq!(url.as_deref(), Some("http://127.0.0.1:3001/api/parse"));
    }

    #[test]
    fn test_upstream_url_preserves_query_verbatim() {
        let url = upstream_url("http://svc/api", "/api/report", Some("depth=16&x=%20y"));
        assert_eq!(url.as_deref(), Some("http://svc/api/report?depth=16&x=%20y"));
    }

    #[test]
    fn test_upstream_url_ignores_empty_query() {
        let url = upstream_url("http://svc/api", "/api/report", Some(""));
        assert_eq!(url.as_deref(), Some("http://svc/api/report"));
    }

    #[test]
    fn test_upstream_url_trims_trailing_slash_on_base() {
        let url = upstream_url("http://svc/api/", "/api/parse", None);
        assert_eq!(url.as_deref(), Some("http://svc/api/parse"));
    }

    #[test]
    fn test_upstream_url_for_bare_prefix_is_base() {
        let url = upstream_url("http://svc/api", "/api", None);
        assert_eq!(url.as_deref(), Some("http://svc/api"));
    }

    #[test]
    fn test_upstream_url_outside_prefix_is_none() {
        assert_eq!(upstream_url("http://svc/api", "/index.html", None), None);
    }

    #[test]
    fn test_hop_by_hop_is_case_insensitive() {
        assert!(is_hop_by_hop("Connection"));
        assert!(is_hop_by_hop("TRANSFER-ENCODING"));
        assert!(!is_hop_by_hop("content-type"));
        assert!(!is_hop_by_hop("authorization"));
    }
}
