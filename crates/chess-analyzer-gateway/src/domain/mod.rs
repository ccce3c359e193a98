//! Domain layer for chess-analyzer-gateway.
//!
//! Only configuration lives here.  Reading environment variables or config
//! files is the host's job; this layer just describes what a gateway needs.

pub mod config;

pub use config::{view_url_for, AssetRoots, GatewayConfig, DEFAULT_PORT};
