//! `alertdesk run` — start the API server.
//!
//! Wires the report backend and workflow client into the shared
//! [`AppState`], builds the router, and serves with graceful shutdown.
//! All handler dependencies are injected here, before the first request
//! is accepted.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::backend::memory::MemoryBackend;
use crate::cli::RunArgs;
use crate::error::AlertdeskError;
use crate::logging;
use crate::server::{self, AppState, Stats};
use crate::workflow::{RecordingWorkflowClient, WorkflowClient};

pub async fn execute(args: RunArgs) -> Result<(), AlertdeskError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let workflow = build_workflow_client(&args).await;
    let backend = Arc::new(MemoryBackend::new(workflow.clone()));

    let state = Arc::new(AppState {
        backend,
        workflow,
        start_time: Instant::now(),
        stats: Stats::new(),
    });

    let router = server::build_router(state.clone(), args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        backend = state.backend.name(),
        workflow = state.workflow.name(),
        commit = env!("ALERTDESK_GIT_SHORT"),
        "alertdesk started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("alertdesk stopped");
    Ok(())
}

#[cfg(feature = "sfn")]
async fn build_workflow_client(args: &RunArgs) -> Arc<dyn WorkflowClient> {
    if let Some(ref arn) = args.state_machine_arn {
        let client = crate::workflow::sfn::StatesWorkflowClient::new(arn, &args.sfn_region).await;
        return Arc::new(client);
    }

    tracing::warn!("no state machine configured, enrichment executions are recorded in-process");
    Arc::new(RecordingWorkflowClient::new())
}

#[cfg(not(feature = "sfn"))]
async fn build_workflow_client(_args: &RunArgs) -> Arc<dyn WorkflowClient> {
    tracing::warn!("built without the sfn feature, enrichment executions are recorded in-process");
    Arc::new(RecordingWorkflowClient::new())
}
