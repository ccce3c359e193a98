//! Native window and webview (tao + wry).  Requires the `webview` feature.
//!
//! # Threading
//!
//! tao insists on owning the main thread, and wry webviews may only be
//! touched from it.  Everything async (gateway, bridge forwarding, automation
//! runs) lives on the tokio runtime of a background thread.  The two sides
//! talk only through [`ShellEvent`]s sent over the tao `EventLoopProxy`:
//!
//! ```text
//! tokio thread                                main thread (tao loop)
//! ────────────                                ──────────────────────
//! forwarding task ── Host(ToHost(record)) ──▶ Supervisor::handle
//! ProxyEvaluator  ── Evaluate{script} ──────▶ WebView::evaluate_script_with_callback
//!                 ◀──────── oneshot reply ───┘
//! page-load handler (main) ── Host(PageLoaded) ─▶ Supervisor::handle
//! ```

mod evaluator;
mod host;

use std::collections::HashMap;

use chess_analyzer_core::WindowId;
use chess_analyzer_view::AutomationSettings;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::application::events::{Flow, HostEvent};
use crate::application::supervisor::{ServiceGateway, Supervisor};
use crate::infrastructure::storage::config::WindowConfig;
use crate::infrastructure::window::script_reply::{ReplySlot, ScriptResult};

pub use evaluator::ProxyEvaluator;
pub use host::{DesktopView, WebViewHost, BRIDGE_SCRIPT};

/// Events delivered to the GUI loop from other threads and from webview
/// callbacks.
#[derive(Debug)]
pub enum ShellEvent {
    /// A lifecycle event for the supervisor.
    Host(HostEvent),
    /// Run `script` in `window` and send its JSON result on `reply`.
    Evaluate {
        window: WindowId,
        script: String,
        reply: oneshot::Sender<ScriptResult>,
    },
}

/// Everything the event loop owns besides the supervisor.
pub struct DesktopState {
    pub(crate) runtime: Handle,
    pub(crate) window_config: WindowConfig,
    pub(crate) automation: AutomationSettings,
    pub(crate) views: HashMap<WindowId, DesktopView>,
    pub(crate) last_id: WindowId,
}

impl DesktopState {
    pub fn new(
        runtime: Handle,
        window_config: WindowConfig,
        automation: AutomationSettings,
    ) -> Self {
        Self {
            runtime,
            window_config,
            automation,
            views: HashMap::new(),
            last_id: WindowId::new(0),
        }
    }

    fn window_for(&self, tao_id: tao::window::WindowId) -> Option<WindowId> {
        self.views
            .iter()
            .find(|(_, view)| view.tao_id() == tao_id)
            .map(|(id, _)| *id)
    }

    fn evaluate(&self, window: WindowId, script: String, reply: oneshot::Sender<ScriptResult>) {
        let Some(view) = self.views.get(&window) else {
            // Dropping `reply` tells the evaluator the view is gone.
            return;
        };
        let slot = ReplySlot::new(reply);
        let callback = slot.clone();
        let result = view
            .webview()
            .evaluate_script_with_callback(&script, move |value| callback.complete(value));
        if let Err(e) = result {
            debug!("script evaluation in {window} failed: {e}");
            slot.fail(e.to_string());
        }
    }
}

/// Runs the GUI event loop on the calling (main) thread.  Never returns.
///
/// Launch happens on the loop's `Init` event.  If the first window cannot be
/// created the process exits with code 1.
pub fn run_desktop<G>(mut supervisor: Supervisor<G>, mut state: DesktopState) -> !
where
    G: ServiceGateway + 'static,
{
    let event_loop = EventLoopBuilder::<ShellEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        let host_event = match event {
            Event::NewEvents(StartCause::Init) => Some(HostEvent::Launch),
            Event::UserEvent(ShellEvent::Host(event)) => Some(event),
            Event::UserEvent(ShellEvent::Evaluate { window, script, reply }) => {
                state.evaluate(window, script, reply);
                None
            }
            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => state.window_for(window_id).map(|id| {
                if let Some(view) = state.views.remove(&id) {
                    view.mark_closed();
                }
                HostEvent::WindowClosed(id)
            }),
            #[cfg(target_os = "macos")]
            Event::Reopen { .. } => Some(HostEvent::Activate),
            _ => None,
        };

        let Some(host_event) = host_event else { return };
        let closed = matches!(host_event, HostEvent::WindowClosed(_));
        let is_launch = matches!(host_event, HostEvent::Launch | HostEvent::Activate);

        let mut host = WebViewHost::new(target, &mut state, proxy.clone());
        let mut flow = match supervisor.handle(host_event, &mut host) {
            Ok(flow) => flow,
            Err(e) if is_launch => {
                error!("{e}");
                *control_flow = ControlFlow::ExitWithCode(1);
                return;
            }
            Err(e) => {
                error!("{e}");
                Flow::Continue
            }
        };

        if closed && state.views.is_empty() {
            let mut host = WebViewHost::new(target, &mut state, proxy.clone());
            flow = supervisor
                .handle(HostEvent::AllWindowsClosed, &mut host)
                .unwrap_or(Flow::Continue);
        }

        if flow == Flow::Exit {
            *control_flow = ControlFlow::Exit;
        }
    })
}
