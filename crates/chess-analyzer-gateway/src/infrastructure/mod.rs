//! Infrastructure layer for chess-analyzer-gateway.
//!
//! # Responsibilities
//!
//! - Binding the TCP listener and reporting bind failures synchronously
//! - Building the axum router (entry document, layered assets, `/api`)
//! - Forwarding `/api` requests to the analysis service with `reqwest`
//! - Graceful stop when the host tears the session down
//!
//! # What does NOT belong here?
//!
//! - Deciding *when* to start or stop (that is the host supervisor)
//! - Reading `PORT` or config files (that is the host's storage layer)

pub mod analysis_proxy;
pub mod http_server;

pub use analysis_proxy::{AnalysisProxy, ProxyError};
pub use http_server::{build_router, spawn_gateway, GatewayError, RunningGateway};
