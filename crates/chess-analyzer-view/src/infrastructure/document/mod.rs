//! Concrete [`Document`](crate::application::document::Document) implementations.
//!
//! - [`script::ScriptDocument`]: drives a real page by evaluating small
//!   JavaScript snippets through a [`script::ScriptEvaluator`].
//! - [`mock::MockDocument`]: an in-memory page for tests.

pub mod mock;
pub mod script;

pub use mock::MockDocument;
pub use script::{ScriptDocument, ScriptEvaluator};
