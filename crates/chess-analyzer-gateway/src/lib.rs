//! chess-analyzer-gateway library crate.
//!
//! The embedded HTTP service the desktop window points at.  It has three jobs:
//!
//! - Serve the analysis page's entry document at `/`.
//! - Serve static assets under `/static/*` from two roots, the build output
//!   shadowing the sources.
//! - Forward everything under `/api` to the external analysis service.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Webview (HTTP)
//!         ↕
//! [chess-analyzer-gateway]
//!   ├── domain/           GatewayConfig, AssetRoots
//!   ├── application/      Pure routing rules: /api remainder, upstream URL,
//!   │                     hop-by-hop header list
//!   └── infrastructure/
//!         ├── http_server/    axum router, bind, graceful stop
//!         └── analysis_proxy/ reqwest forwarding to the analysis service
//!         ↕
//! Analysis service (HTTP)
//! ```
//!
//! # Layer rules
//!
//! - `domain` and `application` perform no I/O.
//! - `infrastructure` depends on both plus `tokio`, `axum`, `tower-http` and
//!   `reqwest`.

/// Domain layer: gateway configuration (no I/O).
pub mod domain;

/// Application layer: routing rules.
pub mod application;

/// Infrastructure layer: HTTP server and upstream forwarding.
pub mod infrastructure;

pub use domain::{AssetRoots, GatewayConfig, DEFAULT_PORT};
pub use infrastructure::{spawn_gateway, GatewayError, ProxyError, RunningGateway};
