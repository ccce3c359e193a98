//! A `Document` backed by JavaScript evaluation.
//!
//! Each DOM operation is a short self-contained script whose completion
//! value is a JSON boolean:
//!
//! | Operation   | Script result                                  |
//! |-------------|------------------------------------------------|
//! | `exists`    | `true` if `querySelector` found an element     |
//! | `set_value` | `true` if the element existed and was written  |
//! | `click`     | `true` if the element existed and was clicked  |
//!
//! Selectors and record text are embedded as JSON string literals, so quotes,
//! backslashes and newlines in a game record cannot break out of the script.
//!
//! Readiness is not polled through scripts.  The host pushes ready-state
//! changes into a `watch` channel from the webview's page-load callback;
//! when the host drops the sender (window closed), waiters see the document
//! as destroyed.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::application::document::{Document, DocumentError};
use crate::domain::ReadyState;

/// Something that can run a script in the view and return its JSON result.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    /// `false` once the underlying view is gone.
    fn is_alive(&self) -> bool;

    /// Evaluates `script` and returns the JSON-serialised completion value.
    async fn evaluate(&self, script: String) -> Result<String, DocumentError>;
}

/// [`Document`] over any [`ScriptEvaluator`].
pub struct ScriptDocument<E> {
    evaluator: E,
    ready: watch::Receiver<ReadyState>,
}

impl<E: ScriptEvaluator> ScriptDocument<E> {
    pub fn new(evaluator: E, ready: watch::Receiver<ReadyState>) -> Self {
        Self { evaluator, ready }
    }

    async fn evaluate_bool(&self, script: String) -> Result<bool, DocumentError> {
        if !self.evaluator.is_alive() {
            return Err(DocumentError::Destroyed);
        }
        let raw = self.evaluator.evaluate(script).await?;
        parse_bool(&raw)
    }
}

#[async_trait]
impl<E: ScriptEvaluator> Document for ScriptDocument<E> {
    fn is_alive(&self) -> bool {
        self.evaluator.is_alive() && self.ready.has_changed().is_ok()
    }

    fn ready_state(&self) -> ReadyState {
        *self.ready.borrow()
    }

    async fn wait_interactive(&self) -> Result<(), DocumentError> {
        let mut rx = self.ready.clone();
        loop {
            if !self.evaluator.is_alive() {
                return Err(DocumentError::Destroyed);
            }
            if rx.borrow_and_update().is_interactive() {
                return Ok(());
            }
            if rx.changed().await.is_err() {
                return Err(DocumentError::Destroyed);
            }
        }
    }

    async fn exists(&self, css: &str) -> Result<bool, DocumentError> {
        self.evaluate_bool(exists_script(css)).await
    }

    async fn set_value(&self, css: &str, text: &str) -> Result<(), DocumentError> {
        if self.evaluate_bool(set_value_script(css, text)).await? {
            Ok(())
        } else {
            Err(DocumentError::UnexpectedResult(format!("no element matches {css}")))
        }
    }

    async fn click(&self, css: &str) -> Result<(), DocumentError> {
        if self.evaluate_bool(click_script(css)).await? {
            Ok(())
        } else {
            Err(DocumentError::UnexpectedResult(format!("no element matches {css}")))
        }
    }
}

// ── Script builders ───────────────────────────────────────────────────────────

/// Encodes `value` as a JavaScript string literal.
fn js_string(value: &str) -> String {
    // serde_json leaves U+2028/U+2029 raw; older engines treat them as line
    // terminators inside string literals.
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

pub fn exists_script(css: &str) -> String {
    format!("document.querySelector({}) !== null", js_string(css))
}

pub fn set_value_script(css: &str, text: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (el === null) return false; \
         el.value = {}; return true; }})()",
        js_string(css),
        js_string(text)
    )
}

pub fn click_script(css: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (el === null) return false; \
         el.click(); return true; }})()",
        js_string(css)
    )
}

fn parse_bool(raw: &str) -> Result<bool, DocumentError> {
    serde_json::from_str::<bool>(raw.trim())
        .map_err(|_| DocumentError::UnexpectedResult(raw.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
