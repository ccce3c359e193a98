//! [`WindowHost`] over tao windows and wry webviews.
//!
//! Opening a window wires one complete bridge for it:
//!
//! - the page's IPC messages (`send-pgn`) go into the view end of the bridge,
//!   and a forwarding task turns each into `HostEvent::ToHost`;
//! - host deliveries (`load-pgn`) come out of the view end into a
//!   [`Controller`] that drives the page through a [`ScriptDocument`].
//!
//! Closing the window drops the webview, which drops both bridge ends it
//! holds, so the forwarding task and the controller finish on their own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess_analyzer_core::{
    open_bridge, Delivery, GameRecord, SubmissionReceiver, ToViewSender, WindowId,
};
use chess_analyzer_view::infrastructure::document::ScriptDocument;
use chess_analyzer_view::{Controller, ReadyState};
use tao::dpi::LogicalSize;
use tao::event_loop::{EventLoopProxy, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder};
use tokio::sync::watch;
use tracing::{debug, info};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::evaluator::ProxyEvaluator;
use super::{DesktopState, ShellEvent};
use crate::application::events::HostEvent;
use crate::infrastructure::window::{WindowError, WindowHost};

/// Installed before any page script runs.  Exposes exactly one capability:
/// posting a game record to the host on `send-pgn`.
pub const BRIDGE_SCRIPT: &str = r#"(() => {
  const api = Object.freeze({
    sendPgn: (pgn) => window.ipc.postMessage(String(pgn)),
  });
  Object.defineProperty(window, "chessAnalyzer", {
    value: api,
    writable: false,
    configurable: false,
    enumerable: false,
  });
})();"#;

/// One open window with its webview and host-side bridge end.
pub struct DesktopView {
    // Declared first so the webview is dropped before its window.
    webview: WebView,
    window: Window,
    to_view: ToViewSender,
    alive: Arc<AtomicBool>,
}

impl DesktopView {
    pub(crate) fn tao_id(&self) -> tao::window::WindowId {
        self.window.id()
    }

    pub(crate) fn webview(&self) -> &WebView {
        &self.webview
    }

    /// Marks the view dead so in-flight automation runs stop.
    pub(crate) fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Borrowed view of the event loop, valid for one event.
pub struct WebViewHost<'a> {
    target: &'a EventLoopWindowTarget<ShellEvent>,
    state: &'a mut DesktopState,
    proxy: EventLoopProxy<ShellEvent>,
}

impl<'a> WebViewHost<'a> {
    pub fn new(
        target: &'a EventLoopWindowTarget<ShellEvent>,
        state: &'a mut DesktopState,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> Self {
        Self { target, state, proxy }
    }
}

impl WindowHost for WebViewHost<'_> {
    fn open_window(&mut self, url: &str) -> Result<WindowId, WindowError> {
        if !self.state.views.is_empty() {
            return Err(WindowError::AlreadyOpen);
        }
        let id = self.state.last_id.next();
        let cfg = &self.state.window_config;

        let window = WindowBuilder::new()
            .with_title(&cfg.title)
            .with_inner_size(LogicalSize::new(cfg.width, cfg.height))
            .build(self.target)
            .map_err(|e| WindowError::Create(e.to_string()))?;

        let (host_port, view_port) = open_bridge();
        let (to_view, submissions) = host_port.split();
        let (view_sender, deliveries) = view_port.split();
        let (ready_tx, ready_rx) = watch::channel(ReadyState::Loading);
        let alive = Arc::new(AtomicBool::new(true));

        let load_proxy = self.proxy.clone();
        let builder = WebViewBuilder::new()
            .with_url(url)
            .with_devtools(cfg.devtools)
            .with_initialization_script(BRIDGE_SCRIPT)
            .with_ipc_handler(move |request| {
                let delivery = view_sender.submit(request.body().as_str());
                debug!("send-pgn from page: {delivery:?}");
            })
            .with_on_page_load_handler(move |event, page_url| match event {
                PageLoadEvent::Started => {
                    ready_tx.send_replace(ReadyState::Loading);
                }
                PageLoadEvent::Finished => {
                    ready_tx.send_replace(ReadyState::Complete);
                    debug!("{id}: load-complete for {page_url}");
                    let _ = load_proxy.send_event(ShellEvent::Host(HostEvent::PageLoaded(id)));
                }
            });

        let webview =
            build_webview(builder, &window).map_err(|e| WindowError::WebView(e.to_string()))?;

        let runtime = &self.state.runtime;
        runtime.spawn(forward_submissions(submissions, self.proxy.clone()));
        let document = ScriptDocument::new(
            ProxyEvaluator::new(id, self.proxy.clone(), Arc::clone(&alive)),
            ready_rx,
        );
        let controller = Controller::new(Arc::new(document), self.state.automation.clone());
        runtime.spawn(controller.serve(deliveries));

        info!("{id} opened at {url}");
        self.state.last_id = id;
        self.state.views.insert(
            id,
            DesktopView {
                webview,
                window,
                to_view,
                alive,
            },
        );
        Ok(id)
    }

    fn focus_window(&mut self, window: WindowId) {
        if let Some(view) = self.state.views.get(&window) {
            view.window.set_focus();
        }
    }

    fn deliver(&mut self, window: WindowId, record: GameRecord) -> Delivery {
        match self.state.views.get(&window) {
            Some(view) => view.to_view.deliver(record),
            None => Delivery::Dropped,
        }
    }
}

/// Turns page submissions into supervisor events until the page goes away.
async fn forward_submissions(
    mut submissions: SubmissionReceiver,
    proxy: EventLoopProxy<ShellEvent>,
) {
    while let Some(record) = submissions.recv().await {
        if proxy.send_event(ShellEvent::Host(HostEvent::ToHost(record))).is_err() {
            break;
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn build_webview(builder: WebViewBuilder<'_>, window: &Window) -> wry::Result<WebView> {
    builder.build(window)
}

/// On Linux wry renders through GTK, so the webview is packed into tao's
/// default vertical box instead of the raw window.
#[cfg(target_os = "linux")]
fn build_webview(builder: WebViewBuilder<'_>, window: &Window) -> wry::Result<WebView> {
    use tao::platform::unix::WindowExtUnix;
    use wry::WebViewBuilderExtUnix;

    match window.default_vbox() {
        Some(vbox) => builder.build_gtk(vbox),
        None => builder.build(window),
    }
}
