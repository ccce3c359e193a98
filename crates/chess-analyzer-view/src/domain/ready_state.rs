//! Document readiness, mirroring `document.readyState`.

/// Loading progress of the view's document.
///
/// Variants are ordered, so `state >= ReadyState::Interactive` reads as "the
/// DOM is parsed and can be queried".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// `true` once controls can be located.
    pub fn is_interactive(self) -> bool {
        self >= Self::Interactive
    }
}
