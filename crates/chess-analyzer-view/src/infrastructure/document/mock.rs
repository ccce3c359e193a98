//! In-memory document for testing automation runs.
//!
//! # Why a mock document?
//!
//! The real document lives inside a native webview, which needs a display
//! server and a GUI event loop.  `MockDocument` models just enough of a page
//! for the automation state machine:
//!
//! - a list of elements, each reachable through one or more CSS selectors,
//! - a `value` per element (set by injection),
//! - a click log,
//! - a ready state that tests can advance,
//! - an alive flag that tests can clear to simulate the view being closed.
//!
//! Selectors are matched literally: an element declared with
//! `&["#pgn", "textarea"]` answers to exactly those two strings.  That is
//! enough to describe which fallback strategy a given page layout satisfies.
//!
//! # Usage in tests
//!
//! ```ignore
//! let doc = MockDocument::loaded()
//!     .with_element("input", &["textarea"])
//!     .with_element("go", &["button"]);
//!
//! let report = AutomationRun::new(record).drive(&doc, &settings).await;
//!
//! assert_eq!(doc.value_of("input").as_deref(), Some("1. e4 *"));
//! assert_eq!(doc.clicks(), vec!["go".to_string()]);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::application::document::{Document, DocumentError};
use crate::domain::ReadyState;

struct MockElement {
    label: String,
    selectors: Vec<String>,
}

#[derive(Default)]
struct MockPage {
    elements: Vec<MockElement>,
    values: HashMap<String, String>,
    clicks: Vec<String>,
    queries: Vec<String>,
}

impl MockPage {
    fn find(&self, css: &str) -> Option<&MockElement> {
        self.elements
            .iter()
            .find(|el| el.selectors.iter().any(|s| s == css))
    }
}

/// A scriptable fake page.
pub struct MockDocument {
    page: Mutex<MockPage>,
    ready: watch::Sender<ReadyState>,
    alive: AtomicBool,
    /// When `true`, `set_value` returns `DocumentError::Evaluation`.
    fail_set_value: bool,
}

impl MockDocument {
    /// Creates an empty page in the given ready state.
    pub fn new(state: ReadyState) -> Self {
        let (ready, _) = watch::channel(state);
        Self {
            page: Mutex::new(MockPage::default()),
            ready,
            alive: AtomicBool::new(true),
            fail_set_value: false,
        }
    }

    /// Creates an empty, fully loaded page.
    pub fn loaded() -> Self {
        Self::new(ReadyState::Complete)
    }

    /// A loaded page laid out like the bundled report page: a `#pgn`
    /// textarea (label `"input"`) and a `#review-button` button (label
    /// `"review"`).
    pub fn report_page() -> Self {
        Self::loaded()
            .with_element("input", &["#pgn", r#"textarea[name="pgn"]"#, "textarea"])
            .with_element("review", &["#review-button", "button"])
    }

    /// Builder form of [`add_element`](Self::add_element).
    pub fn with_element(self, label: &str, selectors: &[&str]) -> Self {
        self.add_element(label, selectors);
        self
    }

    /// Makes `set_value` fail with an evaluation error.
    pub fn failing_set_value(mut self) -> Self {
        self.fail_set_value = true;
        self
    }

    /// Adds an element reachable through each of `selectors`.
    pub fn add_element(&self, label: &str, selectors: &[&str]) {
        self.page.lock().unwrap().elements.push(MockElement {
            label: label.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
        });
    }

    /// Advances (or rewinds) the ready state, waking any waiters.
    pub fn set_ready_state(&self, state: ReadyState) {
        self.ready.send_replace(state);
    }

    /// Simulates the view being closed.  Waiters are woken and every later
    /// call returns `DocumentError::Destroyed`.
    pub fn destroy(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.ready.send_modify(|_| {});
    }

    /// Current value of the element with `label`, if anything was injected.
    pub fn value_of(&self, label: &str) -> Option<String> {
        self.page.lock().unwrap().values.get(label).cloned()
    }

    /// Labels of clicked elements, in click order.
    pub fn clicks(&self) -> Vec<String> {
        self.page.lock().unwrap().clicks.clone()
    }

    /// Every selector passed to `exists`, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.page.lock().unwrap().queries.clone()
    }

    fn check_alive(&self) -> Result<(), DocumentError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(DocumentError::Destroyed)
        }
    }
}

#[async_trait]
impl Document for MockDocument {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn ready_state(&self) -> ReadyState {
        *self.ready.borrow()
    }

    async fn wait_interactive(&self) -> Result<(), DocumentError> {
        let mut rx = self.ready.subscribe();
        loop {
            self.check_alive()?;
            if rx.borrow_and_update().is_interactive() {
                return Ok(());
            }
            if rx.changed().await.is_err() {
                return Err(DocumentError::Destroyed);
            }
        }
    }

    async fn exists(&self, css: &str) -> Result<bool, DocumentError> {
        self.check_alive()?;
        let mut page = self.page.lock().unwrap();
        page.queries.push(css.to_string());
        Ok(page.find(css).is_some())
    }

    async fn set_value(&self, css: &str, text: &str) -> Result<(), DocumentError> {
        self.check_alive()?;
        if self.fail_set_value {
            return Err(DocumentError::Evaluation("mock set_value failure".into()));
        }
        let mut page = self.page.lock().unwrap();
        let label = page
            .find(css)
            .map(|el| el.label.clone())
            .ok_or_else(|| DocumentError::UnexpectedResult(format!("no element matches {css}")))?;
        page.values.insert(label, text.to_string());
        Ok(())
    }

    async fn click(&self, css: &str) -> Result<(), DocumentError> {
        self.check_alive()?;
        let mut page = self.page.lock().unwrap();
        let label = page
            .find(css)
            .map(|el| el.label.clone())
            .ok_or_else(|| DocumentError::UnexpectedResult(format!("no element matches {css}")))?;
        page.clicks.push(label);
        Ok(())
    }
}
