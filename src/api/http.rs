//! HTTP API Server
//!
//! Plain-text write/read endpoints plus JSON status and health probes.
//! `POST /` takes an opaque body (optionally `"[n]content"` prefixed) and
//! replies with the acknowledgment text; `GET /` returns the rendered log.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::config::NodeRole;
use crate::coordinator::LogCoordinator;
use crate::error::{Error, Result};

/// Shared application state
pub struct AppState {
    /// Write/read orchestrator
    pub coordinator: Arc<LogCoordinator>,
}

/// HTTP API server
pub struct HttpServer {
    bind_address: String,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(bind_address: String, coordinator: Arc<LogCoordinator>) -> Self {
        Self {
            bind_address,
            state: Arc::new(AppState { coordinator }),
        }
    }

    /// Start serving until the shutdown future resolves
    pub async fn start(&self, shutdown: impl std::future::Future<Output = ()> + Send + 'static) -> Result<()> {
        let app = router(Arc::clone(&self.state));

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        tracing::info!("HTTP API listening on {}", self.bind_address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| Error::Transport(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

/// Build the router for the given state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_read).post(handle_write))
        .route("/health", get(handle_health))
        .route("/status", get(handle_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Response Types ============

/// Node status response
#[derive(Debug, Serialize)]
struct StatusResponse {
    role: String,
    log_length: usize,
    pending_batches: usize,
}

// ============ Handlers ============

/// POST /: append a message; the reply is always the ack text for the
/// appended content. Malformed prefixes degrade to defaults, never to an
/// error status.
async fn handle_write(State(state): State<Arc<AppState>>, body: String) -> (axum::http::StatusCode, String) {
    tracing::info!(body = %body, "Post message");

    match state.coordinator.handle_post(&body).await {
        Ok(ack) => (axum::http::StatusCode::OK, ack),
        // Only reachable with a configured quorum timeout
        Err(e) => {
            tracing::error!(error = %e, "Write failed");
            (axum::http::StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}

/// GET /: the rendered log, id-ordered
async fn handle_read(State(state): State<Arc<AppState>>) -> String {
    state.coordinator.handle_get().await
}

/// GET /health: liveness probe
async fn handle_health() -> &'static str {
    "OK"
}

/// GET /status: role and log/backlog counters
async fn handle_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let coordinator = &state.coordinator;

    Json(StatusResponse {
        role: match coordinator.role() {
            NodeRole::Primary => "primary".to_string(),
            NodeRole::Secondary => "secondary".to_string(),
        },
        log_length: coordinator.store().len().await,
        pending_batches: coordinator.pending_batches().await,
    })
}
