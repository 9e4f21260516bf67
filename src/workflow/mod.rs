//! Enrichment workflow invocation and failure intake.
//!
//! Defines the [`WorkflowClient`] trait for triggering an asynchronous
//! enrichment execution, the [`RecordingWorkflowClient`] double used in
//! tests and as the in-process stand-in when no orchestrator is
//! configured, and [`record_failure`], the entry point the orchestration
//! layer calls when an execution fails. The AWS Step Functions client
//! lives in [`sfn`] behind the `sfn` feature.

#[cfg(feature = "sfn")]
pub mod sfn;

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WorkflowError {
    #[error("workflow invocation failed: {source}")]
    Invoke {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("workflow input is not serializable: {0}")]
    Input(#[from] serde_json::Error),
}

/// Input for one enrichment execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionInput {
    /// Execution name, unique per invocation.
    pub name: String,

    /// Opaque payload handed to the orchestrator.
    pub input: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// Orchestrator-assigned execution identifier, when it provides one.
    pub execution_id: Option<String>,
}

// async_trait is required here because WorkflowClient is held as
// Arc<dyn WorkflowClient> and native async fn in traits does not
// support dyn dispatch.
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn start_execution(
        &self,
        input: ExecutionInput,
    ) -> Result<ExecutionOutput, WorkflowError>;
}

/// Workflow client double that only records the inputs it receives.
///
/// Substitutable wherever a [`WorkflowClient`] is expected; its entire
/// state is the append-only call record exposed by
/// [`calls`](Self::calls).
#[derive(Debug, Default)]
pub struct RecordingWorkflowClient {
    calls: Mutex<Vec<ExecutionInput>>,
}

impl RecordingWorkflowClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The inputs received so far, in receipt order.
    #[must_use]
    pub fn calls(&self) -> Vec<ExecutionInput> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WorkflowClient for RecordingWorkflowClient {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn start_execution(
        &self,
        input: ExecutionInput,
    ) -> Result<ExecutionOutput, WorkflowError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(input);
        }
        Ok(ExecutionOutput::default())
    }
}

/// Intake for failure events emitted by the enrichment workflow.
///
/// Attaches the report identifier when the event carries one (best
/// effort; the orchestrator payload does not guarantee it), writes one
/// log entry, and performs no recovery. This function cannot fail — a
/// logging problem must never surface a secondary error to the
/// orchestrator.
pub fn record_failure(event: &Value) {
    let report_id = event
        .get("report_id")
        .and_then(Value::as_str)
        .unwrap_or_default();

    tracing::error!(report_id = %report_id, event = %event, "enrichment workflow failed");
}
