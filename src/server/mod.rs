//! HTTP surface for the gateway.
//!
//! Two routes:
//!
//! - `GET /` — plain-text liveness acknowledgement.
//! - `GET /api/video2/{videoid}` — normalized record on hit or fresh
//!   fetch; on failure, one of the two policies in
//!   [`config::FailurePolicy`], chosen once at startup. Neither the error
//!   payload nor the fallback record is ever cached.

pub mod config;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{Result, VidgateError};
use crate::gateway::VideoGateway;
use crate::types::NormalizedRecord;
use config::FailurePolicy;

/// Shared state for route handlers.
pub struct AppState {
    pub gateway: Arc<VideoGateway>,
    pub failure_policy: FailurePolicy,
    /// Built once at startup; served verbatim under the fallback policy.
    pub fallback: Arc<NormalizedRecord>,
}

impl AppState {
    pub fn new(gateway: Arc<VideoGateway>, failure_policy: FailurePolicy) -> Self {
        let fallback = Arc::new(gateway.fallback_record());
        Self {
            gateway,
            failure_policy,
            fallback,
        }
    }
}

/// Build the router: liveness at `/`, video lookup under `/api/video2`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/api/video2/{videoid}", get(routes::get_video))
        .with_state(state)
}

/// Serve until ctrl-c, then stop the cache sweeper on the way out.
pub async fn run(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let app = build_router(Arc::clone(&state));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| VidgateError::Configuration(format!("cannot bind {addr}: {e}")))?;

    info!(%addr, "vidgated listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| VidgateError::Http(e.to_string()))?;

    state.gateway.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    // Errors installing the handler leave no way to signal shutdown
    // gracefully; treat them as an immediate shutdown request.
    let _ = tokio::signal::ctrl_c().await;
}
