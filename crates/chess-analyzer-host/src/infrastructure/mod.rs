//! Infrastructure layer for the host.
//!
//! OS-facing adapters: file reads for CLI ingestion, the embedded gateway,
//! the TOML config file and (behind the `webview` feature) the native
//! window.
//!
//! **Dependency rule**: the application layer names the traits defined here
//! (`WindowHost`) but never a concrete implementation.

pub mod gateway;
pub mod ingest;
pub mod storage;
pub mod window;

#[cfg(feature = "webview")]
pub mod webview;
