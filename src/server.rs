//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the report
//! backend, workflow client, stats, and uptime), [`build_router`] for
//! constructing the Axum router with middleware layers, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::backend::ReportBackend;
use crate::health::health_handler;
use crate::middleware;
use crate::workflow::WorkflowClient;

#[derive(Debug)]
pub struct Stats {
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

/// Process-wide dependencies, injected once at startup.
///
/// Immutable for the lifetime of the process apart from the atomic
/// counters; read concurrently by every in-flight request without
/// synchronization.
pub struct AppState {
    pub backend: Arc<dyn ReportBackend>,
    pub workflow: Arc<dyn WorkflowClient>,
    pub start_time: Instant,
    pub stats: Stats,
}

/// Bind the API surface. Called once at startup; the route table is
/// immutable thereafter.
pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route("/alert", post(api::submit_alert))
        .route("/report/{report_id}/alert", get(api::report_alerts))
        .route("/report/{report_id}/section", get(api::report_sections))
        .route("/report/{report_id}/attribute", get(api::report_attributes))
        .route("/health", get(health_handler))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::correlation,
                ))
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
