//! chess-analyzer-view library crate.
//!
//! Everything that happens on the view side of the bridge once a game record
//! arrives: wait for the page to be usable, find the record input, fill it,
//! give the page's scripts a moment, find the analyse trigger and press it.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! load-pgn (ViewReceiver)
//!         ↓
//! [chess-analyzer-view]
//!   ├── domain/           RunState, FailureReason, ReadyState, selector chains
//!   ├── application/      Document trait, AutomationRun state machine,
//!   │                     Controller (one task per delivery)
//!   └── infrastructure/
//!         └── document/   ScriptDocument (JS over any evaluator), MockDocument
//!         ↓
//! The hosted page's DOM
//! ```
//!
//! # Failure policy
//!
//! Nothing in this crate returns an error to its caller.  A run that cannot
//! find a control ends in `Failed`, a run whose page disappears ends in
//! `Abandoned`, and both are logged.  The page simply stays un-analysed.

/// Domain layer: run states, ready states and selector chains (no I/O).
pub mod domain;

/// Application layer: the automation state machine and its controller.
pub mod application;

/// Infrastructure layer: concrete `Document` implementations.
pub mod infrastructure;

pub use application::automation::{AutomationRun, AutomationSettings, RunReport};
pub use application::controller::Controller;
pub use application::document::{Document, DocumentError};
pub use domain::{FailureReason, ReadyState, RunState, SelectorChain, SelectorStrategy};
