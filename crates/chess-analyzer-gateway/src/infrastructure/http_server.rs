//! HTTP server: router construction, bind, serve task and graceful stop.
//!
//! # Lifecycle
//!
//! ```text
//! spawn_gateway()          bind std listener (sync, errors surface here)
//!   └─ runtime.spawn()     axum::serve(..).with_graceful_shutdown(rx)
//! RunningGateway::stop()   send shutdown → in-flight requests finish → task ends
//! ```
//!
//! Binding happens synchronously on the caller's thread so the supervisor,
//! which runs on the GUI thread, learns about an occupied port before it opens
//! the window.  Serving happens on whatever tokio runtime `runtime` belongs to.

use std::io;
use std::net::SocketAddr;

use axum::routing::any;
use axum::Router;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::application::{API_PREFIX, STATIC_PREFIX};
use crate::domain::config::{view_url_for, GatewayConfig};
use crate::infrastructure::analysis_proxy::{forward_analysis, AnalysisProxy, ProxyError};

/// Errors that prevent the gateway from starting.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The port is occupied or the process may not bind it.
    #[error("failed to bind gateway listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The bound socket could not be prepared for async use.
    #[error("failed to prepare gateway listener: {0}")]
    Listener(#[source] io::Error),

    /// The forwarding client could not be built.
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// Builds the gateway's router.
///
/// # Errors
///
/// Returns [`GatewayError::Proxy`] if the upstream HTTP client cannot be built.
pub fn build_router(config: &GatewayConfig) -> Result<Router, GatewayError> {
    let proxy = AnalysisProxy::new(
        &config.analysis_url,
        config.max_body_bytes,
        config.upstream_timeout,
    )?;

    // First match wins: a file in the build output hides the source copy.
    let assets =
        ServeDir::new(&config.assets.primary).fallback(ServeDir::new(&config.assets.fallback));

    let router = Router::new()
        .route(API_PREFIX, any(forward_analysis))
        // `{*rest}` never matches an empty remainder.
        .route(&format!("{API_PREFIX}/"), any(forward_analysis))
        .route(&format!("{API_PREFIX}/{{*rest}}"), any(forward_analysis))
        .with_state(proxy)
        .route_service("/", ServeFile::new(&config.entry_document))
        .nest_service(STATIC_PREFIX, assets)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// Binds the listener and starts serving on `runtime`.
///
/// # Errors
///
/// Returns [`GatewayError::Bind`] if the address is unavailable (for example
/// the port is already in use).  No task is spawned in that case.
pub fn spawn_gateway(
    config: &GatewayConfig,
    runtime: &Handle,
) -> Result<RunningGateway, GatewayError> {
    let std_listener =
        std::net::TcpListener::bind(config.bind_addr).map_err(|source| GatewayError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    std_listener
        .set_nonblocking(true)
        .map_err(GatewayError::Listener)?;
    let local_addr = std_listener.local_addr().map_err(GatewayError::Listener)?;

    let router = build_router(config)?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = runtime.spawn(async move {
        // `from_std` must run inside the runtime that will drive the socket.
        let listener = match tokio::net::TcpListener::from_std(std_listener) {
            Ok(listener) => listener,
            Err(e) => {
                error!("gateway on {local_addr}: failed to register listener: {e}");
                return;
            }
        };

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                // A dropped sender counts as a shutdown request too.
                let _ = shutdown_rx.await;
            })
            .await;

        match result {
            Ok(()) => info!("gateway on {local_addr} stopped"),
            Err(e) => error!("gateway on {local_addr} failed: {e}"),
        }
    });

    info!("gateway listening on {local_addr}");

    Ok(RunningGateway {
        local_addr,
        shutdown: Some(shutdown_tx),
        task,
    })
}

/// Handle to a started gateway.
///
/// The listener belongs to this handle: [`stop`](Self::stop) or dropping the
/// handle closes it.
#[derive(Debug)]
pub struct RunningGateway {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl RunningGateway {
    /// The address actually bound (useful when the configured port was 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL a local window should load.
    pub fn view_url(&self) -> String {
        view_url_for(self.local_addr)
    }

    /// `true` until [`stop`](Self::stop) is called or the serve task ends.
    pub fn is_running(&self) -> bool {
        self.shutdown.is_some() && !self.task.is_finished()
    }

    /// Requests a graceful stop without waiting for it.  Idempotent.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            debug!("gateway on {}: stop requested", self.local_addr);
            let _ = tx.send(());
        }
    }

    /// Requests a graceful stop and waits until the listener is closed.
    pub async fn shutdown(mut self) {
        self.stop();
        let _ = (&mut self.task).await;
    }
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
