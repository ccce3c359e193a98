//! Host lifecycle events and the loop-control result.

use chess_analyzer_core::{GameRecord, WindowId};

/// Something the GUI loop observed that the supervisor must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The application finished starting.
    Launch,
    /// The page in `window` finished loading.
    PageLoaded(WindowId),
    /// The page submitted a record on `send-pgn`.
    ToHost(GameRecord),
    /// The user closed `window`.
    WindowClosed(WindowId),
    /// No windows remain.
    AllWindowsClosed,
    /// The application was re-activated (dock icon click on macOS).
    Activate,
}

/// Whether the GUI loop keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}
