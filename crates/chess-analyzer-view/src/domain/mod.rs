//! Domain layer for chess-analyzer-view.
//!
//! Pure types describing an automation run and the page it acts on.  No
//! timers, no channels, no DOM access.

pub mod ready_state;
pub mod run_state;
pub mod selectors;

pub use ready_state::ReadyState;
pub use run_state::{FailureReason, RunState};
pub use selectors::{SelectorChain, SelectorStrategy};
