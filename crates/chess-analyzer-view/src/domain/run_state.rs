//! States of one automation run.
//!
//! ```text
//! Idle ─▶ LocatingInput ─▶ Injected ─▶ AwaitingTrigger ─▶ Submitted
//!              │                              │
//!              ├──────────▶ Failed ◀──────────┤
//!              └──────────▶ Abandoned ◀───────┘
//! ```
//!
//! `Submitted`, `Failed` and `Abandoned` are terminal.  There is no retry
//! edge: a failed run stays failed.

use std::fmt;

/// Why a run ended in [`RunState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No strategy in the input chain matched.
    InputNotFound,
    /// No strategy in the trigger chain matched.
    TriggerNotFound,
    /// The document never became interactive within the readiness timeout.
    ReadinessTimeout,
    /// The document reported an error other than being destroyed.
    Document(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound => f.write_str("record input not found"),
            Self::TriggerNotFound => f.write_str("analyse trigger not found"),
            Self::ReadinessTimeout => f.write_str("document never became interactive"),
            Self::Document(msg) => write!(f, "document error: {msg}"),
        }
    }
}

/// Current position of a run in its state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    LocatingInput,
    Injected,
    AwaitingTrigger,
    Submitted,
    Failed(FailureReason),
    /// The view was torn down while the run was waiting.  No further DOM
    /// calls were made.
    Abandoned,
}

impl RunState {
    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::LocatingInput => "LocatingInput",
            Self::Injected => "Injected",
            Self::AwaitingTrigger => "AwaitingTrigger",
            Self::Submitted => "Submitted",
            Self::Failed(_) => "Failed",
            Self::Abandoned => "Abandoned",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "Failed ({reason})"),
            other => f.write_str(other.name()),
        }
    }
}
