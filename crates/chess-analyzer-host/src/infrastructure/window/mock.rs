//! Mock window host for unit and integration testing.
//!
//! # Why a mock window host?
//!
//! The real host creates native windows, which needs a display server and a
//! GUI event loop on the main thread.  `MockWindowHost` allocates window ids
//! and records every call so tests can assert exactly what the supervisor
//! asked for and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let mut host = MockWindowHost::new();
//! let window = supervisor.launch(&mut host).unwrap();
//! supervisor.page_loaded(window, &mut host);
//!
//! assert_eq!(host.deliveries().len(), 1);
//! ```

use chess_analyzer_core::{Delivery, GameRecord, WindowId};

use super::{WindowError, WindowHost};

/// Records opens, focus requests and deliveries.
#[derive(Debug, Default)]
pub struct MockWindowHost {
    next_id: u64,
    opened: Vec<String>,
    open_windows: Vec<WindowId>,
    focused: Vec<WindowId>,
    deliveries: Vec<(WindowId, GameRecord)>,
    fail_next_open: bool,
}

impl MockWindowHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `open_window` call fail.
    pub fn fail_next_open(&mut self) {
        self.fail_next_open = true;
    }

    /// Simulates the user closing `window`; later deliveries to it drop.
    pub fn close(&mut self, window: WindowId) {
        self.open_windows.retain(|w| *w != window);
    }

    /// URLs passed to `open_window`, in call order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.clone()
    }

    pub fn focused(&self) -> Vec<WindowId> {
        self.focused.clone()
    }

    /// Records sent on `load-pgn`, with their target window.
    pub fn deliveries(&self) -> &[(WindowId, GameRecord)] {
        &self.deliveries
    }
}

impl WindowHost for MockWindowHost {
    fn open_window(&mut self, url: &str) -> Result<WindowId, WindowError> {
        if std::mem::take(&mut self.fail_next_open) {
            return Err(WindowError::Create("mock failure".into()));
        }
        self.next_id += 1;
        let id = WindowId::new(self.next_id);
        self.opened.push(url.to_string());
        self.open_windows.push(id);
        Ok(id)
    }

    fn focus_window(&mut self, window: WindowId) {
        self.focused.push(window);
    }

    fn deliver(&mut self, window: WindowId, record: GameRecord) -> Delivery {
        if !self.open_windows.contains(&window) {
            return Delivery::Dropped;
        }
        self.deliveries.push((window, record));
        Delivery::Sent
    }
}
