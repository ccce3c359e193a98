//! The embedded gateway as a [`ServiceGateway`].
//!
//! [`EmbeddedGateway`] is called from the GUI thread but serves on the tokio
//! runtime owned by the background thread, so it keeps a runtime `Handle`
//! and passes it to `spawn_gateway`.

use chess_analyzer_gateway::{spawn_gateway, GatewayConfig, GatewayError, RunningGateway};
use tokio::runtime::Handle;
use tracing::debug;

use crate::application::supervisor::ServiceGateway;

pub mod mock;

/// Starts and stops the real axum gateway.
pub struct EmbeddedGateway {
    config: GatewayConfig,
    runtime: Handle,
    running: Option<RunningGateway>,
}

impl EmbeddedGateway {
    pub fn new(config: GatewayConfig, runtime: Handle) -> Self {
        Self {
            config,
            runtime,
            running: None,
        }
    }
}

impl ServiceGateway for EmbeddedGateway {
    fn start(&mut self) -> Result<(), GatewayError> {
        if self.is_running() {
            return Ok(());
        }
        self.running = Some(spawn_gateway(&self.config, &self.runtime)?);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut running) = self.running.take() {
            debug!("stopping gateway on {}", running.local_addr());
            running.stop();
        }
    }

    fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(RunningGateway::is_running)
    }

    /// The bound address once running (the port may have been `0`), the
    /// configured address otherwise.
    fn url(&self) -> String {
        match &self.running {
            Some(running) => running.view_url(),
            None => self.config.view_url(),
        }
    }
}
