//! Gateway configuration types.
//!
//! [`GatewayConfig`] is a plain struct with no global state and no
//! environment reads.  The host populates it from its TOML config file and
//! the `PORT` environment variable; tests build it directly against temporary
//! directories.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Port the gateway listens on when nothing overrides it.
pub const DEFAULT_PORT: u16 = 3000;

/// The two static asset roots, searched in order.
///
/// A request under `/static` is answered from `primary` when the file exists
/// there and from `fallback` otherwise.  The roots are never merged: a file in
/// `primary` completely hides the file with the same relative path in
/// `fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
    /// Build output (e.g. `freechess/dist/public`).
    pub primary: PathBuf,
    /// Source tree (e.g. `freechess/src/public`).
    pub fallback: PathBuf,
}

/// All runtime configuration for the embedded gateway.
///
/// # Example
///
/// ```rust
/// use chess_analyzer_gateway::GatewayConfig;
///
/// let cfg = GatewayConfig::default().with_port(8080);
/// assert_eq!(cfg.bind_addr.port(), 8080);
/// assert_eq!(cfg.view_url(), "http://127.0.0.1:8080/");
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address and port the listener binds to.
    ///
    /// Defaults to loopback: the only intended client is the shell's own
    /// window.
    pub bind_addr: SocketAddr,

    /// Static asset roots served under `/static`.
    pub assets: AssetRoots,

    /// Document served for `GET /`.
    pub entry_document: PathBuf,

    /// Base URL of the analysis service.  A request for `/api/x?y` is
    /// forwarded to `{analysis_url}/x?y`.
    pub analysis_url: String,

    /// Largest request body forwarded to the analysis service.
    pub max_body_bytes: usize,

    /// Upper bound on one forwarded request, connect through last byte.
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    /// Builds the default layout of the freechess web app under `root`.
    ///
    /// | Field           | Value                                         |
    /// |-----------------|-----------------------------------------------|
    /// | assets.primary  | `root/freechess/dist/public`                  |
    /// | assets.fallback | `root/freechess/src/public`                   |
    /// | entry_document  | `root/freechess/src/public/pages/report/index.html` |
    pub fn under_root(root: &Path) -> Self {
        Self {
            assets: AssetRoots {
                primary: root.join("freechess/dist/public"),
                fallback: root.join("freechess/src/public"),
            },
            entry_document: root.join("freechess/src/public/pages/report/index.html"),
            ..Self::default()
        }
    }

    /// Returns a copy listening on `port` instead.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// URL the window should load for a gateway bound to `bind_addr`.
    pub fn view_url(&self) -> String {
        view_url_for(self.bind_addr)
    }
}

/// URL a local client uses to reach a listener bound to `addr`.
///
/// Wildcard binds (`0.0.0.0`, `::`) are reached through loopback.
pub fn view_url_for(addr: SocketAddr) -> String {
    let host = match addr.ip() {
        ip if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        ip => ip,
    };
    match host {
        IpAddr::V4(v4) => format!("http://{v4}:{}/", addr.port()),
        IpAddr::V6(v6) => format!("http://[{v6}]:{}/", addr.port()),
    }
}

impl Default for GatewayConfig {
    /// Defaults relative to the current directory.
    ///
    /// | Field            | Default                     |
    /// |------------------|-----------------------------|
    /// | bind_addr        | `127.0.0.1:3000`            |
    /// | analysis_url     | `http://127.0.0.1:3001/api` |
    /// | max_body_bytes   | 8 MiB                       |
    /// | upstream_timeout | 120 seconds                 |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            assets: AssetRoots {
                primary: PathBuf::from("freechess/dist/public"),
                fallback: PathBuf::from("freechess/src/public"),
            },
            entry_document: PathBuf::from("freechess/src/public/pages/report/index.html"),
            analysis_url: "http://127.0.0.1:3001/api".to_string(),
            max_body_bytes: 8 * 1024 * 1024,
            // Full-game analysis requests are slow; the upstream evaluates
            // every position before answering.
            upstream_timeout: Duration::from_secs(120),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_3000() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.bind_addr.port(), 3000);
    }

    #[test]
    fn test_default_binds_loopback() {
        let cfg = GatewayConfig::default();
        assert!(cfg.bind_addr.ip().is_loopback());
    }

    #[test]
    fn test_with_port_keeps_bind_ip() {
        let cfg = GatewayConfig::default().with_port(4567);
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:4567");
    }

    #[test]
    fn test_under_root_places_dist_before_src() {
        // Arrange / Act
        let cfg = GatewayConfig::under_root(Path::new("/opt/analyzer"));

        // Assert: build output is the primary root.
        assert_eq!(
            cfg.assets.primary,
            PathBuf::from("/opt/analyzer/freechess/dist/public")
        );
        assert_eq!(
            cfg.assets.fallback,
            PathBuf::from("/opt/analyzer/freechess/src/public")
        );
        assert!(cfg.entry_document.ends_with("pages/report/index.html"));
    }

    #[test]
    fn test_view_url_for_loopback() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        assert_eq!(view_url_for(addr), "http://127.0.0.1:3000/");
    }

    #[test]
    fn test_view_url_for_wildcard_uses_loopback() {
        let addr: SocketAddr = "0.0.0.0:3000".parse().unwrap();
        assert_eq!(view_url_for(addr), "http://127.0.0.1:3000/");
    }

    #[test]
    fn test_view_url_for_ipv6_is_bracketed() {
        let addr: SocketAddr = "[::1]:3000".parse().unwrap();
        assert_eq!(view_url_for(addr), "http://[::1]:3000/");
    }
}
