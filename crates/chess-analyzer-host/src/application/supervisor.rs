//! Supervisor: owns the session and reacts to host lifecycle events.
//!
//! # Session model (for beginners)
//!
//! A *session* is one live window paired with the gateway it was pointed at,
//! plus the CLI record waiting to be delivered once the page has loaded.
//! The supervisor keeps it in a single `Option<Session>` slot:
//!
//! ```text
//!            launch / activate                 window_closed
//!   None ───────────────────────▶ Some(Session) ─────────────▶ None
//!                                   │  ▲
//!                 launch (again) ───┘  └── focus existing window
//! ```
//!
//! There is never a second window.  A second launch request focuses the
//! existing one.  The gateway is started before the window opens and stopped
//! when the window closes, so the listener never outlives the session.
//!
//! # Failure policy
//!
//! - The gateway failing to bind is logged and ignored; the window still
//!   opens and shows a connection error.
//! - A missing or unreadable CLI file is an `info` note; no record is sent.
//! - Only failing to open the window is returned to the caller.

use std::path::PathBuf;

use chess_analyzer_core::{Delivery, GameRecord, WindowId};
use chess_analyzer_gateway::GatewayError;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::events::{Flow, HostEvent};
use crate::infrastructure::ingest::load_cli_record;
use crate::infrastructure::window::{WindowError, WindowHost};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors the supervisor returns to the event loop.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("could not open the application window: {0}")]
    Window(#[from] WindowError),
}

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Lifecycle control over the embedded HTTP gateway.
///
/// The production implementation wraps `spawn_gateway`; tests use
/// `MockServiceGateway` (mockall) or the hand-written
/// [`MockGateway`](crate::infrastructure::gateway::mock::MockGateway).
#[cfg_attr(test, mockall::automock)]
pub trait ServiceGateway {
    /// Binds and starts serving.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Bind`] when the address is unavailable.
    fn start(&mut self) -> Result<(), GatewayError>;

    /// Stops serving.  No-op when not running.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// URL the window should load.
    fn url(&self) -> String;
}

/// Whether the process survives its last window closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidencyPolicy {
    /// Exit when the last window closes (Windows, Linux).
    ExitOnLastWindow,
    /// Stay running with no window until re-activated (macOS).
    StayResident,
}

impl ResidencyPolicy {
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "macos") {
            Self::StayResident
        } else {
            Self::ExitOnLastWindow
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// The one live window and its gateway.
#[derive(Debug)]
pub struct Session {
    window: WindowId,
    gateway_url: String,
    pending: Option<GameRecord>,
}

impl Session {
    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    /// `true` while the CLI record has not yet been delivered.
    pub fn has_pending_record(&self) -> bool {
        self.pending.is_some()
    }
}

// ── Supervisor ────────────────────────────────────────────────────────────────

pub struct Supervisor<G: ServiceGateway> {
    gateway: G,
    cli_path: Option<PathBuf>,
    policy: ResidencyPolicy,
    session: Option<Session>,
}

impl<G: ServiceGateway> Supervisor<G> {
    /// Creates a supervisor with no session and the platform's residency policy.
    pub fn new(gateway: G, cli_path: Option<PathBuf>) -> Self {
        Self {
            gateway,
            cli_path,
            policy: ResidencyPolicy::for_current_platform(),
            session: None,
        }
    }

    pub fn with_policy(mut self, policy: ResidencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Single dispatch point for the event loop.
    ///
    /// # Errors
    ///
    /// [`SupervisorError::Window`] if a launch or activate could not open the
    /// window.
    pub fn handle(
        &mut self,
        event: HostEvent,
        host: &mut dyn WindowHost,
    ) -> Result<Flow, SupervisorError> {
        match event {
            HostEvent::Launch => {
                self.launch(host)?;
            }
            HostEvent::PageLoaded(window) => {
                self.page_loaded(window, host);
            }
            HostEvent::ToHost(record) => {
                self.to_host(record, host);
            }
            HostEvent::WindowClosed(window) => self.window_closed(window),
            HostEvent::AllWindowsClosed => return Ok(self.all_windows_closed()),
            HostEvent::Activate => self.activate(host)?,
        }
        Ok(Flow::Continue)
    }

    /// Ensures a session exists and returns its window.
    ///
    /// # Errors
    ///
    /// [`SupervisorError::Window`] if the window could not be opened.  A
    /// gateway this call started is stopped again in that case.
    pub fn launch(&mut self, host: &mut dyn WindowHost) -> Result<WindowId, SupervisorError> {
        if let Some(session) = &self.session {
            debug!("launch: session already open; focusing {}", session.window);
            host.focus_window(session.window);
            return Ok(session.window);
        }

        if self.gateway.is_running() {
            debug!("launch: reusing running gateway");
        } else if let Err(e) = self.gateway.start() {
            error!("gateway failed to start: {e}; continuing without it");
        }

        let gateway_url = self.gateway.url();
        let window = match host.open_window(&gateway_url) {
            Ok(window) => window,
            Err(e) => {
                self.gateway.stop();
                return Err(e.into());
            }
        };

        let pending = load_cli_record(self.cli_path.as_deref());
        info!(
            "session opened: {window} at {gateway_url} ({})",
            if pending.is_some() { "record pending" } else { "no record" }
        );
        self.session = Some(Session {
            window,
            gateway_url,
            pending,
        });
        Ok(window)
    }

    /// Delivers the pending CLI record to `window`, at most once.
    ///
    /// Returns `None` when nothing was sent.
    pub fn page_loaded(&mut self, window: WindowId, host: &mut dyn WindowHost) -> Option<Delivery> {
        let Some(session) = self.session.as_mut().filter(|s| s.window == window) else {
            debug!("load-complete from {window}, which is not the session window; ignored");
            return None;
        };
        let record = session.pending.take()?;
        let delivery = host.deliver(window, record);
        debug!("initial record to {window}: {delivery:?}");
        Some(delivery)
    }

    /// Re-sends an in-app submission to the session's view.
    ///
    /// Returns `None` when there is no session; the record is dropped.
    pub fn to_host(&mut self, record: GameRecord, host: &mut dyn WindowHost) -> Option<Delivery> {
        let Some(session) = &self.session else {
            debug!("send-pgn with no open window; {} bytes dropped", record.len());
            return None;
        };
        let delivery = host.deliver(session.window, record);
        if delivery == Delivery::Dropped {
            debug!("forward to {} dropped: view is gone", session.window);
        }
        Some(delivery)
    }

    /// Tears down the session owned by `window`.
    pub fn window_closed(&mut self, window: WindowId) {
        match &self.session {
            Some(session) if session.window == window => {
                self.gateway.stop();
                self.session = None;
                info!("session closed: {window}");
            }
            _ => debug!("close of unknown {window}; ignored"),
        }
    }

    /// Decides whether the process ends now that no window remains.
    pub fn all_windows_closed(&mut self) -> Flow {
        match self.policy {
            ResidencyPolicy::ExitOnLastWindow => {
                info!("last window closed; exiting");
                Flow::Exit
            }
            ResidencyPolicy::StayResident => {
                debug!("last window closed; staying resident");
                Flow::Continue
            }
        }
    }

    /// Recreates the session if the process was left without one.
    ///
    /// # Errors
    ///
    /// See [`launch`](Self::launch).
    pub fn activate(&mut self, host: &mut dyn WindowHost) -> Result<(), SupervisorError> {
        if self.session.is_some() {
            debug!("activate with a live session; nothing to do");
            return Ok(());
        }
        self.launch(host).map(|_| ())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
