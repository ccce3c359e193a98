//! chess-analyzer-host library entry point.
//!
//! The privileged side of the desktop shell.  It owns the process, the
//! embedded gateway and the single window, and it is the only side that may
//! read files.
//!
//! # Architecture
//!
//! ```text
//! tao event loop (main thread)             tokio runtime (background thread)
//! ────────────────────────────             ─────────────────────────────────
//! HostEvent ──▶ Supervisor::handle          RunningGateway (axum)
//!                 ├─ ServiceGateway ──────▶ start / stop
//!                 ├─ WindowHost ──────────▶ load-pgn ──▶ Controller (view crate)
//!                 └─ ingest (CLI file)          ▲
//!                                               │
//!               ToHost ◀── forwarding task ◀── send-pgn (page IPC)
//! ```
//!
//! The supervisor is synchronous and knows nothing about tao or wry.  The
//! `webview` feature adds the concrete window host and event loop.

pub mod application;
pub mod infrastructure;
