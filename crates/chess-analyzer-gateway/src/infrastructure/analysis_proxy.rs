//! Forwarding of `/api` requests to the external analysis service.
//!
//! The gateway does not know what the analysis API looks like.  It copies the
//! method, the path remainder, the query string, the body and every
//! end-to-end header to the upstream, then copies the upstream's status,
//! headers and body back.  Hop-by-hop headers are dropped in both directions.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{HeaderMap, CONTENT_LENGTH, HOST};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::{is_hop_by_hop, upstream_url};

/// Failures while forwarding one request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request path is not under `/api` (router misconfiguration).
    #[error("path {0} is not under the /api prefix")]
    OutsidePrefix(String),

    /// The request body could not be read or exceeded the size limit.
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    /// The analysis service could not be reached or failed mid-response.
    #[error("analysis service request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Shared forwarding state, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct AnalysisProxy {
    client: reqwest::Client,
    base_url: Arc<str>,
    max_body_bytes: usize,
}

impl AnalysisProxy {
    /// Creates a proxy for the analysis service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Upstream`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        max_body_bytes: usize,
        timeout: Duration,
    ) -> Result<Self, ProxyError> {
        // `no_proxy` keeps an HTTP_PROXY in the user's environment from
        // hijacking what is always a loopback call.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url),
            max_body_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forwards `request` and returns the upstream's response.
    ///
    /// # Errors
    ///
    /// See [`ProxyError`].
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();
        let target = upstream_url(&self.base_url, parts.uri.path(), parts.uri.query())
            .ok_or_else(|| ProxyError::OutsidePrefix(parts.uri.path().to_string()))?;

        let body = to_bytes(body, self.max_body_bytes)
            .await
            .map_err(ProxyError::Body)?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        // reqwest derives both from the target URL and the body.
        headers.remove(HOST);
        headers.remove(CONTENT_LENGTH);

        debug!("forwarding {} {} ({} bytes)", parts.method, target, body.len());

        let upstream = self
            .client
            .request(parts.method, &target)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);
        let bytes = upstream.bytes().await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

/// Removes hop-by-hop headers, including any extra ones the peer listed in
/// its own `Connection` header.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all("connection")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in listed {
        headers.remove(name.as_str());
    }

    let fixed: Vec<_> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name.as_str()))
        .cloned()
        .collect();
    for name in fixed {
        headers.remove(name);
    }
}

/// axum handler for `ANY /api` and `ANY /api/*`.
///
/// Failures become `502 Bad Gateway`; the gateway itself keeps serving.
pub async fn forward_analysis(State(proxy): State<AnalysisProxy>, request: Request) -> Response {
    match proxy.forward(request).await {
        Ok(response) => response,
        Err(ProxyError::Body(e)) => {
            warn!("rejected /api request body: {e}");
            (StatusCode::PAYLOAD_TOO_LARGE, "request body rejected").into_response()
        }
        Err(e) => {
            warn!("analysis forwarding failed: {e}");
            (StatusCode::BAD_GATEWAY, "analysis service unavailable").into_response()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
