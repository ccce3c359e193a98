//! Integration tests for the gateway's HTTP surface.
//!
//! Each test starts a real gateway on an ephemeral loopback port, pointed at
//! a temporary asset tree and (where needed) at a small echo server standing
//! in for the analysis service.  Requests are made with `reqwest`, exactly as
//! a browser would make them.
//!
//! ```text
//! reqwest ──▶ gateway (127.0.0.1:0) ──/api──▶ echo upstream (127.0.0.1:0)
//!                  │
//!                  └── /, /static ──▶ tempdir/{dist,src}/public
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use axum::http::{HeaderMap, Method, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::runtime::Handle;

use chess_analyzer_gateway::{spawn_gateway, AssetRoots, GatewayConfig, RunningGateway};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Writes a small two-root asset tree:
///
/// - `dist/public/app.js`        → "dist build"
/// - `src/public/app.js`         → "src copy" (shadowed)
/// - `src/public/board.css`      → "src only"
/// - `src/public/pages/report/index.html` → entry document
fn write_assets(root: &Path) -> GatewayConfig {
    let dist = root.join("dist/public");
    let src = root.join("src/public");
    fs::create_dir_all(&dist).unwrap();
    fs::create_dir_all(src.join("pages/report")).unwrap();
    fs::write(dist.join("app.js"), "dist build").unwrap();
    fs::write(src.join("app.js"), "src copy").unwrap();
    fs::write(src.join("board.css"), "src only").unwrap();
    fs::write(
        src.join("pages/report/index.html"),
        "<textarea id=\"pgn\"></textarea><button id=\"review-button\">Analyse</button>",
    )
    .unwrap();

    GatewayConfig {
        assets: AssetRoots {
            primary: dist,
            fallback: src.clone(),
        },
        entry_document: src.join("pages/report/index.html"),
        ..GatewayConfig::default()
    }
    .with_port(0)
}

/// Echo handler: reports what the upstream actually received.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> impl IntoResponse {
    let token = headers
        .get("x-analysis-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    (
        [("x-upstream", "echo")],
        format!("{method} {uri} token={token} body={body}"),
    )
}

async fn spawn_echo_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(echo);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn start(config: &GatewayConfig) -> RunningGateway {
    spawn_gateway(config, &Handle::current()).expect("gateway must start")
}

fn url(gateway: &RunningGateway, path: &str) -> String {
    format!("http://{}{}", gateway.local_addr(), path)
}

// ── Static surface ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_root_serves_entry_document() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let gateway = start(&write_assets(dir.path()));

    // Act
    let response = reqwest::get(url(&gateway, "/")).await.unwrap();

    // Assert
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("id=\"pgn\""));
}

#[tokio::test]
async fn test_static_primary_root_shadows_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = start(&write_assets(dir.path()));

    let body = reqwest::get(url(&gateway, "/static/app.js"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // The build output wins; the roots are not merged.
    assert_eq!(body, "dist build");
}

#[tokio::test]
async fn test_static_falls_back_to_source_root() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = start(&write_assets(dir.path()));

    let response = reqwest::get(url(&gateway, "/static/board.css")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "src only");
}

#[tokio::test]
async fn test_static_missing_in_both_roots_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = start(&write_assets(dir.path()));

    let response = reqwest::get(url(&gateway, "/static/missing.js")).await.unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_static_serves_when_primary_root_absent() {
    // Arrange: no build has been run, so the dist root does not exist.
    let dir = tempfile::tempdir().unwrap();
    let config = write_assets(dir.path());
    fs::remove_dir_all(&config.assets.primary).unwrap();
    let gateway = start(&config);

    // Act
    let body = reqwest::get(url(&gateway, "/static/app.js"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Assert
    assert_eq!(body, "src copy");
}

// ── /api forwarding ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_get_forwards_path_and_query() {
    // Arrange
    let upstream = spawn_echo_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_assets(dir.path());
    config.analysis_url = format!("http://{upstream}/api");
    let gateway = start(&config);

    // Act
    let response = reqwest::get(url(&gateway, "/api/report/7?depth=16"))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("x-upstream").unwrap(), "echo");
    let body = response.text().await.unwrap();
    assert!(body.starts_with("GET /api/report/7?depth=16 "), "got {body}");
}

#[tokio::test]
async fn test_api_post_forwards_body_and_headers_unchanged() {
    let upstream = spawn_echo_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_assets(dir.path());
    config.analysis_url = format!("http://{upstream}/api");
    let gateway = start(&config);

    let response = reqwest::Client::new()
        .post(url(&gateway, "/api/parse"))
        .header("x-analysis-token", "t-123")
        .body("1. e4 e5 2. Nf3 *")
        .send()
        .await
        .unwrap();

    let body = response.text().await.unwrap();
    assert_eq!(body, "POST /api/parse token=t-123 body=1. e4 e5 2. Nf3 *");
}

#[tokio::test]
async fn test_api_bare_prefix_is_forwarded() {
    let upstream = spawn_echo_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_assets(dir.path());
    config.analysis_url = format!("http://{upstream}/api");
    let gateway = start(&config);

    let body = reqwest::get(url(&gateway, "/api"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with("GET /api "), "got {body}");
}

#[tokio::test]
async fn test_api_prefix_with_trailing_slash_is_forwarded() {
    let upstream = spawn_echo_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_assets(dir.path());
    config.analysis_url = format!("http://{upstream}/api");
    let gateway = start(&config);

    let response = reqwest::get(url(&gateway, "/api/?depth=8")).await.unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.starts_with("GET /api/?depth=8 "), "got {body}");
}

#[tokio::test]
async fn test_api_with_unreachable_upstream_is_bad_gateway() {
    // Arrange: reserve a port and release it so nothing listens there.
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let dir = tempfile::tempdir().unwrap();
    let mut config = write_assets(dir.path());
    config.analysis_url = format!("http://{closed_addr}/api");
    let gateway = start(&config);

    // Act
    let response = reqwest::get(url(&gateway, "/api/parse")).await.unwrap();

    // Assert: the gateway answers, and keeps serving static content afterwards.
    assert_eq!(response.status(), 502);
    let root = reqwest::get(url(&gateway, "/")).await.unwrap();
    assert_eq!(root.status(), 200);
}

#[tokio::test]
async fn test_api_oversized_body_is_rejected() {
    let upstream = spawn_echo_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_assets(dir.path());
    config.analysis_url = format!("http://{upstream}/api");
    config.max_body_bytes = 16;
    let gateway = start(&config);

    let response = reqwest::Client::new()
        .post(url(&gateway, "/api/parse"))
        .body("x".repeat(64))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 413);
}
