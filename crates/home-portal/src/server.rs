// crates/home-portal/src/server.rs
// ============================================================================
// Module: Portal Server
// Description: HTTP server wiring for the home, health, and readiness routes.
// Purpose: Dispatch requests to the home handler over axum.
// Dependencies: axum, tokio, home-portal config, handlers, telemetry, audit
// ============================================================================

//! ## Overview
//! The portal server binds a TCP listener and routes `GET /` to
//! [`HomeHandler::index`], alongside liveness and readiness endpoints.
//! Every route records through the metrics and audit seams, and readiness
//! is answered by a probe that fails closed. Configuration is validated
//! before any socket is opened.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::ConnectInfo;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;

use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditEventParams;
use crate::audit::RequestAuditSink;
use crate::audit::StderrAuditSink;
use crate::config::PortalConfig;
use crate::config::ServerConfig;
use crate::handlers::HomeHandler;
use crate::telemetry::NoopMetrics;
use crate::telemetry::RequestMetricEvent;
use crate::telemetry::RequestMetrics;
use crate::telemetry::RequestOutcome;
use crate::telemetry::Route;

// ============================================================================
// SECTION: Portal Server
// ============================================================================

/// Portal server instance.
pub struct PortalServer {
    /// Validated server configuration.
    config: PortalConfig,
    /// Shared state handed to request handlers.
    state: Arc<ServerState>,
}

impl PortalServer {
    /// Builds a new portal server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PortalServerError`] when initialization fails.
    pub fn from_config(config: PortalConfig) -> Result<Self, PortalServerError> {
        config.validate().map_err(|err| PortalServerError::Config(err.to_string()))?;
        let handler = HomeHandler::new(config.site.clone());
        let audit = build_audit_sink(&config)?;
        let readiness = Arc::new(ViewReadinessProbe::new(handler.clone()));
        let state = Arc::new(build_server_state(handler, Arc::new(NoopMetrics), audit, readiness));
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the shared handler state.
    #[must_use]
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Serves HTTP requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`PortalServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), PortalServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind_addr()
            .map_err(|err| PortalServerError::Config(err.to_string()))?;
        emit_non_loopback_warning(&self.config.server, addr);
        let app = build_router(Arc::clone(&self.state))
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| PortalServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| PortalServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the shared server state.
fn build_server_state(
    handler: HomeHandler,
    metrics: Arc<dyn RequestMetrics>,
    audit: Arc<dyn RequestAuditSink>,
    readiness: Arc<dyn ReadinessProbe>,
) -> ServerState {
    ServerState {
        handler,
        metrics,
        audit,
        readiness,
    }
}

/// Builds the audit sink from portal configuration.
fn build_audit_sink(config: &PortalConfig) -> Result<Arc<dyn RequestAuditSink>, PortalServerError> {
    if !config.audit.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.audit.path {
        Some(path) => {
            let sink = FileAuditSink::new(std::path::Path::new(path))
                .map_err(|err| PortalServerError::Init(err.to_string()))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Builds the portal router over shared state.
fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .with_state(state)
}

/// Shared server state for request handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Handler serving the default route.
    handler: HomeHandler,
    /// Metrics sink for request observations.
    metrics: Arc<dyn RequestMetrics>,
    /// Audit sink for request events.
    audit: Arc<dyn RequestAuditSink>,
    /// Readiness probe consulted by the readiness route.
    readiness: Arc<dyn ReadinessProbe>,
}

impl ServerState {
    /// Returns the handler serving the default route.
    #[must_use]
    pub const fn handler(&self) -> &HomeHandler {
        &self.handler
    }
}

// ============================================================================
// SECTION: Readiness
// ============================================================================

/// Readiness probe for the portal.
pub trait ReadinessProbe: Send + Sync {
    /// Returns whether the portal can serve its default view.
    fn check(&self) -> bool;
}

/// Probe that renders the default view and requires a non-empty body.
pub struct ViewReadinessProbe {
    /// Handler used to render the probe view.
    handler: HomeHandler,
}

impl ViewReadinessProbe {
    /// Creates a probe over the given handler.
    #[must_use]
    pub const fn new(handler: HomeHandler) -> Self {
        Self {
            handler,
        }
    }
}

impl ReadinessProbe for ViewReadinessProbe {
    fn check(&self) -> bool {
        !self.handler.index().html().trim().is_empty()
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles the home route by dispatching to the home handler.
async fn handle_index(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let started = Instant::now();
    let view = state.handler.index();
    record_request(&state, Route::Home, Some(peer), StatusCode::OK, view.html().len(), started);
    view
}

/// Handles the liveness route.
async fn handle_health(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let started = Instant::now();
    let payload = json!({
        "status": "ok",
    });
    let response_bytes = payload.to_string().len();
    record_request(&state, Route::Health, Some(peer), StatusCode::OK, response_bytes, started);
    axum::Json(payload)
}

/// Handles the readiness route.
///
/// Readiness fails closed: the portal is ready only when the readiness
/// probe confirms the default view renders to a non-empty body.
async fn handle_ready(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let started = Instant::now();
    let (status, payload) = if state.readiness.check() {
        (
            StatusCode::OK,
            json!({
                "status": "ready",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "unavailable",
            }),
        )
    };
    let response_bytes = payload.to_string().len();
    record_request(&state, Route::Ready, Some(peer), status, response_bytes, started);
    (status, axum::Json(payload))
}

/// Records metrics and audit events for a served request.
fn record_request(
    state: &ServerState,
    route: Route,
    peer: Option<SocketAddr>,
    status: StatusCode,
    response_bytes: usize,
    started: Instant,
) {
    let outcome = if status.is_success() {
        RequestOutcome::Ok
    } else {
        RequestOutcome::Error
    };
    let event = RequestMetricEvent {
        route,
        outcome,
        status: status.as_u16(),
        response_bytes,
    };
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, started.elapsed());
    state.audit.record(&RequestAuditEvent::new(RequestAuditEventParams {
        route,
        peer_ip: peer.map(|addr| addr.ip().to_string()),
        outcome,
        status: status.as_u16(),
        response_bytes,
    }));
}

/// Warns on stderr when serving on a non-loopback interface.
fn emit_non_loopback_warning(server: &ServerConfig, addr: SocketAddr) {
    if server.allow_non_loopback && !addr.ip().is_loopback() {
        eprintln!(
            "home-portal: WARNING: serving on non-loopback interface {addr}; ensure this \
             exposure is intended"
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Portal server errors.
#[derive(Debug, thiserror::Error)]
pub enum PortalServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
