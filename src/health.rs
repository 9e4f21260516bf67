//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version and commit, uptime, backend/workflow client names, and
//! cumulative request statistics. Operational only — not part of the
//! alert/report API surface, so it does not go through the responder.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub commit: String,
    pub uptime_seconds: u64,
    pub backend: BackendHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct BackendHealth {
    pub reports: String,
    pub workflow: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_succeeded: u64,
    pub requests_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("ALERTDESK_GIT_SHORT").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        backend: BackendHealth {
            reports: state.backend.name().to_string(),
            workflow: state.workflow.name().to_string(),
        },
        stats: StatsResponse {
            requests_succeeded: state.stats.succeeded.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
