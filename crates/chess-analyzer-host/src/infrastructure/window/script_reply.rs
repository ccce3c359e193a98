//! Reply path for scripts the GUI thread evaluates on behalf of an
//! automation run.
//!
//! The run waits on a `oneshot` receiver.  On the GUI thread the sender is
//! wrapped in a [`ReplySlot`] shared by two parties: the webview's result
//! callback and the error branch taken when the webview refuses the script.
//! Whichever answers first is delivered; later answers are ignored.
//!
//! | GUI thread outcome        | Run sees                          |
//! |---------------------------|-----------------------------------|
//! | callback fires            | `Ok(json)`                        |
//! | evaluation call fails     | `Err(DocumentError::Evaluation)`  |
//! | slot dropped (no window)  | `Err(DocumentError::Destroyed)`   |

use std::sync::{Arc, Mutex};

use chess_analyzer_view::DocumentError;
use tokio::sync::oneshot;

/// JSON completion value of a script, or why there is none.
pub type ScriptResult = Result<String, DocumentError>;

/// Shared, answer-once sending side of a script reply.
#[derive(Debug, Clone)]
pub struct ReplySlot {
    inner: Arc<Mutex<Option<oneshot::Sender<ScriptResult>>>>,
}

impl ReplySlot {
    pub fn new(reply: oneshot::Sender<ScriptResult>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(reply))),
        }
    }

    /// Delivers the script's completion value.
    pub fn complete(&self, value: String) {
        self.answer(Ok(value));
    }

    /// Reports that the script could not be evaluated.  The view itself is
    /// still there, so this is not a teardown.
    pub fn fail(&self, message: impl Into<String>) {
        self.answer(Err(DocumentError::Evaluation(message.into())));
    }

    fn answer(&self, result: ScriptResult) {
        let sender = self.inner.lock().ok().and_then(|mut slot| slot.take());
        if let Some(tx) = sender {
            // The run may have given up waiting; nothing to do then.
            let _ = tx.send(result);
        }
    }
}

/// Waits for the GUI thread's answer.
///
/// A slot dropped without answering means the window no longer exists.
pub async fn await_reply(reply: oneshot::Receiver<ScriptResult>) -> ScriptResult {
    reply.await.unwrap_or(Err(DocumentError::Destroyed))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
