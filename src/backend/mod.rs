//! Report storage and enrichment backend seam.
//!
//! Defines the [`ReportBackend`] trait the API handlers program
//! against and [`BackendError`] for the failures a backend can
//! surface. The in-memory reference implementation lives in
//! [`memory`].

pub mod memory;

use async_trait::async_trait;

use crate::report::{Alert, Attribute, ReportId, Section};
use crate::workflow::WorkflowError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("report {0} not found")]
    ReportNotFound(ReportId),

    #[error("backend unavailable ({backend}): {source}")]
    Unavailable {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

// async_trait is required here because ReportBackend is used as
// Arc<dyn ReportBackend> and native async fn in traits (Rust 1.75+)
// does not support dyn dispatch.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Accept an alert, attach it to its report, and trigger one
    /// enrichment execution. Returns the report the alert landed in.
    async fn submit_alert(&self, alert: Alert) -> Result<ReportId, BackendError>;

    async fn alerts(&self, id: &ReportId) -> Result<Vec<Alert>, BackendError>;

    async fn sections(&self, id: &ReportId) -> Result<Vec<Section>, BackendError>;

    async fn attributes(&self, id: &ReportId) -> Result<Vec<Attribute>, BackendError>;
}
