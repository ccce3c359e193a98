//! # chess-analyzer-core
//!
//! Shared foundation for the Chess Analyzer desktop shell: the game-record
//! payload, window identity, and the bridge protocol that carries records
//! between the privileged host process and the isolated view.
//!
//! This crate is used by the host supervisor, the view-side automation
//! controller, and their tests.  It opens no sockets, owns no windows and never
//! touches the file system.
//!
//! # Architecture overview (for beginners)
//!
//! The shell is made of two halves that must never share capabilities:
//!
//! - The **host** can read files, start the embedded HTTP gateway and create
//!   windows.
//! - The **view** is a web page.  It may only hand text to the host and receive
//!   text back.
//!
//! The only thing the two halves exchange is a [`GameRecord`]: an opaque chess
//! game transcript.  This crate defines:
//!
//! - **`domain`** – [`GameRecord`], its [`Provenance`] tag and [`WindowId`].
//!
//! - **`bridge`** – The two one-way channels (`send-pgn` towards the host,
//!   `load-pgn` towards the view) and the typed port handles each side holds.

pub mod bridge;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `chess_analyzer_core::GameRecord` instead of the full module path.
pub use bridge::channel::{BridgeMessage, Channel, TO_HOST_CHANNEL, TO_VIEW_CHANNEL};
pub use bridge::port::{
    open_bridge, Delivery, HostPort, SubmissionReceiver, ToViewSender, ViewPort, ViewReceiver,
    ViewSender,
};
pub use domain::record::{GameRecord, Provenance};
pub use domain::window::WindowId;
