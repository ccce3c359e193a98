//! The seam between the automation logic and a live page.
//!
//! # Why a trait? (for beginners)
//!
//! In the desktop build the "document" is a page inside a native webview and
//! every query is a JavaScript round-trip.  In tests it is an in-memory
//! [`MockDocument`](crate::infrastructure::document::mock::MockDocument).
//! The state machine in [`automation`](super::automation) only ever talks to
//! `&dyn Document`, so both work without changes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ReadyState;

/// Errors a document can report back to a run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The view was closed or reloaded; the run must stop touching it.
    #[error("document has been destroyed")]
    Destroyed,

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("unexpected script result: {0}")]
    UnexpectedResult(String),
}

/// A page whose controls can be located, filled and clicked.
#[async_trait]
pub trait Document: Send + Sync {
    /// `false` once the view has been torn down.
    fn is_alive(&self) -> bool;

    /// Last known ready state.
    fn ready_state(&self) -> ReadyState;

    /// Resolves once the ready state reaches `Interactive`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Destroyed`] if the view goes away while waiting.
    async fn wait_interactive(&self) -> Result<(), DocumentError>;

    /// Returns `true` if `css` matches at least one element.
    async fn exists(&self, css: &str) -> Result<bool, DocumentError>;

    /// Sets the `value` of the first element matching `css` to `text`.
    async fn set_value(&self, css: &str, text: &str) -> Result<(), DocumentError>;

    /// Activates the first element matching `css`.
    async fn click(&self, css: &str) -> Result<(), DocumentError>;
}
