//! Script evaluation from the tokio thread, executed on the GUI thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chess_analyzer_core::WindowId;
use chess_analyzer_view::infrastructure::document::ScriptEvaluator;
use chess_analyzer_view::DocumentError;
use tao::event_loop::EventLoopProxy;
use tokio::sync::oneshot;

use super::ShellEvent;
use crate::infrastructure::window::script_reply::await_reply;

/// Sends `Evaluate` requests for one window through the event-loop proxy.
///
/// The proxy is behind a `Mutex` because `ScriptEvaluator` must be `Sync`
/// and tao only promises `Send` for it.
pub struct ProxyEvaluator {
    window: WindowId,
    proxy: Mutex<EventLoopProxy<ShellEvent>>,
    alive: Arc<AtomicBool>,
}

impl ProxyEvaluator {
    pub fn new(
        window: WindowId,
        proxy: EventLoopProxy<ShellEvent>,
        alive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            window,
            proxy: Mutex::new(proxy),
            alive,
        }
    }
}

#[async_trait]
impl ScriptEvaluator for ProxyEvaluator {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn evaluate(&self, script: String) -> Result<String, DocumentError> {
        let (reply, result) = oneshot::channel();
        {
            let proxy = self
                .proxy
                .lock()
                .map_err(|_| DocumentError::Evaluation("event loop proxy poisoned".into()))?;
            proxy
                .send_event(ShellEvent::Evaluate {
                    window: self.window,
                    script,
                    reply,
                })
                .map_err(|_| DocumentError::Destroyed)?;
        }
        await_reply(result).await
    }
}
