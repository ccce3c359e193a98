//! Window hosting.
//!
//! The supervisor opens, focuses and delivers to windows only through the
//! [`WindowHost`] trait.  The desktop build implements it with tao + wry in
//! [`webview`](crate::infrastructure::webview); tests use
//! [`mock::MockWindowHost`].

use chess_analyzer_core::{Delivery, GameRecord, WindowId};
use thiserror::Error;

pub mod mock;
pub mod script_reply;

/// Error type for window operations.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("failed to create native window: {0}")]
    Create(String),

    #[error("failed to create webview: {0}")]
    WebView(String),

    #[error("a window is already open")]
    AlreadyOpen,
}

/// Something that can host the single application window.
pub trait WindowHost {
    /// Opens a window loading `url`.
    ///
    /// # Errors
    ///
    /// [`WindowError`] when the native window or its webview cannot be built.
    fn open_window(&mut self, url: &str) -> Result<WindowId, WindowError>;

    /// Brings `window` to the front.  Unknown ids are ignored.
    fn focus_window(&mut self, window: WindowId);

    /// Sends `record` to the view in `window` on `load-pgn`.
    fn deliver(&mut self, window: WindowId, record: GameRecord) -> Delivery;
}
