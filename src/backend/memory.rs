//! In-memory [`ReportBackend`] implementation.
//!
//! Aggregates alerts into reports keyed by `(detector, alert_key)` and
//! starts one enrichment execution per accepted alert. Serves as the
//! backend for local runs and tests; enrichment steps write sections
//! and derived attributes back through [`MemoryBackend::add_section`]
//! and [`MemoryBackend::add_attribute`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use super::{BackendError, ReportBackend};
use crate::report::{Alert, Attribute, ReportId, Section};
use crate::workflow::{ExecutionInput, WorkflowClient};

#[derive(Debug, Default)]
struct ReportEntry {
    alerts: Vec<Alert>,
    sections: Vec<Section>,
    attributes: Vec<Attribute>,
}

#[derive(Default)]
struct Inner {
    // (detector, alert_key) -> report
    by_key: HashMap<(String, String), ReportId>,
    reports: HashMap<ReportId, ReportEntry>,
}

pub struct MemoryBackend {
    workflow: Arc<dyn WorkflowClient>,
    inner: RwLock<Inner>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new(workflow: Arc<dyn WorkflowClient>) -> Self {
        Self {
            workflow,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Attach an enrichment finding to an existing report.
    pub async fn add_section(&self, id: &ReportId, section: Section) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .reports
            .get_mut(id)
            .ok_or_else(|| BackendError::ReportNotFound(id.clone()))?;
        entry.sections.push(section);
        Ok(())
    }

    /// Attach a derived attribute to an existing report.
    pub async fn add_attribute(
        &self,
        id: &ReportId,
        attribute: Attribute,
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .reports
            .get_mut(id)
            .ok_or_else(|| BackendError::ReportNotFound(id.clone()))?;
        entry.attributes.push(attribute);
        Ok(())
    }
}

#[async_trait]
impl ReportBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn submit_alert(&self, alert: Alert) -> Result<ReportId, BackendError> {
        let report_id = {
            let mut inner = self.inner.write().await;
            let key = (alert.detector.clone(), alert.alert_key.clone());
            let report_id = inner
                .by_key
                .entry(key)
                .or_insert_with(ReportId::generate)
                .clone();

            let entry = inner.reports.entry(report_id.clone()).or_default();
            entry.attributes.extend(alert.attributes.iter().cloned());
            entry.alerts.push(alert.clone());
            report_id
            // Lock released before the workflow call below
        };

        self.workflow
            .start_execution(ExecutionInput {
                name: format!("{}-{}", report_id, uuid::Uuid::new_v4()),
                input: json!({
                    "report_id": report_id,
                    "alert": alert,
                }),
            })
            .await?;

        Ok(report_id)
    }

    async fn alerts(&self, id: &ReportId) -> Result<Vec<Alert>, BackendError> {
        let inner = self.inner.read().await;
        inner
            .reports
            .get(id)
            .map(|e| e.alerts.clone())
            .ok_or_else(|| BackendError::ReportNotFound(id.clone()))
    }

    async fn sections(&self, id: &ReportId) -> Result<Vec<Section>, BackendError> {
        let inner = self.inner.read().await;
        inner
            .reports
            .get(id)
            .map(|e| e.sections.clone())
            .ok_or_else(|| BackendError::ReportNotFound(id.clone()))
    }

    async fn attributes(&self, id: &ReportId) -> Result<Vec<Attribute>, BackendError> {
        let inner = self.inner.read().await;
        inner
            .reports
            .get(id)
            .map(|e| e.attributes.clone())
            .ok_or_else(|| BackendError::ReportNotFound(id.clone()))
    }
}
