//! Window identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one native window instance for the lifetime of the process.
///
/// Ids are allocated by the window host and never reused, so a late event
/// that refers to a window destroyed earlier can be recognised and ignored
/// even after a replacement window has been opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}
