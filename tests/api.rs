//! Integration tests for the API surface: route dispatch, the responder
//! protocol, and correlation identifiers.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};

use alertdesk::backend::memory::MemoryBackend;
use alertdesk::backend::{BackendError, ReportBackend};
use alertdesk::report::{Alert, Attribute, AttributeType, ReportId, Section};
use alertdesk::server::{self, AppState, Stats};
use alertdesk::workflow::{RecordingWorkflowClient, WorkflowClient};

const CORRELATION_HEADER: &str = "x-correlation-id";

/// Backend whose every operation fails with an opaque infrastructure
/// error, for exercising the unclassified path of the responder.
struct FailingBackend;

#[async_trait]
impl ReportBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn submit_alert(&self, _alert: Alert) -> Result<ReportId, BackendError> {
        Err(outage())
    }

    async fn alerts(&self, _id: &ReportId) -> Result<Vec<Alert>, BackendError> {
        Err(outage())
    }

    async fn sections(&self, _id: &ReportId) -> Result<Vec<Section>, BackendError> {
        Err(outage())
    }

    async fn attributes(&self, _id: &ReportId) -> Result<Vec<Attribute>, BackendError> {
        Err(outage())
    }
}

fn outage() -> BackendError {
    BackendError::Unavailable {
        backend: "failing",
        source: "connection refused (table offline)".into(),
    }
}

async fn start_server(
    backend: Arc<dyn ReportBackend>,
    workflow: Arc<dyn WorkflowClient>,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState {
        backend,
        workflow,
        start_time: Instant::now(),
        stats: Stats::new(),
    });

    let router = server::build_router(state, 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}

async fn start_memory_server() -> (
    SocketAddr,
    Arc<MemoryBackend>,
    Arc<RecordingWorkflowClient>,
    tokio::sync::oneshot::Sender<()>,
) {
    let workflow = Arc::new(RecordingWorkflowClient::new());
    let backend = Arc::new(MemoryBackend::new(workflow.clone()));
    let (addr, shutdown) = start_server(backend.clone(), workflow.clone()).await;
    (addr, backend, workflow, shutdown)
}

fn sample_alert() -> Value {
    json!({
        "detector": "guardduty",
        "rule_name": "Recon:EC2/PortProbeUnprotectedPort",
        "alert_key": "i-0abc123",
        "description": "port probe from a known scanner",
        "attributes": [{
            "type": "ipaddr",
            "key": "remote address",
            "value": "198.51.100.7",
            "context": ["remote"],
        }],
    })
}

#[tokio::test]
async fn submitted_alert_gets_a_receipt_and_triggers_enrichment() {
    let (addr, _, workflow, shutdown) = start_memory_server().await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{addr}/alert"))
        .json(&sample_alert())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let receipt: Value = resp.json().await.unwrap();
    let report_id = receipt["report_id"].as_str().unwrap();
    assert!(ReportId::parse(report_id).is_ok());

    let calls = workflow.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].input["report_id"], report_id);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn report_artifacts_dispatch_to_their_own_handlers() {
    let (addr, backend, _, shutdown) = start_memory_server().await;

    let client = reqwest::Client::new();
    let receipt: Value = client
        .post(format!("http://{addr}/alert"))
        .json(&sample_alert())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let report_id = ReportId::parse(receipt["report_id"].as_str().unwrap()).unwrap();

    // Enrichment writes a section back
    backend
        .add_section(
            &report_id,
            Section {
                author: "geoip".into(),
                title: "Source location".into(),
                content: json!({ "country": "NL" }),
            },
        )
        .await
        .unwrap();

    let alerts: Value = client
        .get(format!("http://{addr}/report/{report_id}/alert"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // Success bodies are the direct serialization, no envelope
    assert_eq!(alerts.as_array().unwrap().len(), 1);
    assert_eq!(alerts[0]["alert_key"], "i-0abc123");

    let sections: Value = client
        .get(format!("http://{addr}/report/{report_id}/section"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sections[0]["author"], "geoip");

    let attributes: Value = client
        .get(format!("http://{addr}/report/{report_id}/attribute"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(attributes[0]["type"], "ipaddr");
    assert_eq!(attributes[0]["value"], "198.51.100.7");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unknown_report_yields_structured_not_found() {
    let (addr, _, _, shutdown) = start_memory_server().await;

    let id = ReportId::generate();
    let resp = reqwest::get(format!("http://{addr}/report/{id}/alert"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "report_not_found");
    assert_eq!(body["error"]["report_id"], id.as_str());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn malformed_report_id_yields_bad_request() {
    let (addr, _, _, shutdown) = start_memory_server().await;

    for artifact in ["alert", "section", "attribute"] {
        let resp = reqwest::get(format!("http://{addr}/report/abc123/{artifact}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "invalid_report_id");
        assert_eq!(body["error"]["report_id"], "abc123");
    }

    let _ = shutdown.send(());
}

#[tokio::test]
async fn alert_without_detector_yields_bad_request() {
    let (addr, _, workflow, shutdown) = start_memory_server().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/alert"))
        .json(&json!({
            "detector": "",
            "rule_name": "r",
            "alert_key": "k",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_alert");
    assert!(workflow.calls().is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn backend_outage_is_an_opaque_system_error() {
    let workflow: Arc<RecordingWorkflowClient> = Arc::new(RecordingWorkflowClient::new());
    let (addr, shutdown) = start_server(Arc::new(FailingBackend), workflow).await;

    let id = ReportId::generate();
    let resp = reqwest::get(format!("http://{addr}/report/{id}/alert"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    assert!(resp.headers().contains_key(CORRELATION_HEADER));

    let body = resp.text().await.unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "SystemError" })
    );
    // The internal failure detail never reaches the caller
    assert!(!body.contains("connection refused"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn every_response_carries_a_fresh_correlation_id() {
    let (addr, _, _, shutdown) = start_memory_server().await;

    let id = ReportId::generate();
    let mut seen = HashSet::new();

    for _ in 0..3 {
        let resp = reqwest::get(format!("http://{addr}/report/{id}/alert"))
            .await
            .unwrap();
        let correlation = resp
            .headers()
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(seen.insert(correlation), "correlation id reused");
    }

    // Present on success, failure, and the fallback alike
    let resp = reqwest::get(format!("http://{addr}/nonexistent")).await.unwrap();
    assert_eq!(resp.status(), 404);
    assert!(resp.headers().contains_key(CORRELATION_HEADER));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn concurrent_requests_stay_isolated() {
    let (addr, _, _, shutdown) = start_memory_server().await;

    let id = ReportId::generate();
    let client = reqwest::Client::new();

    let requests = (0..100).map(|_| {
        let client = client.clone();
        let url = format!("http://{addr}/report/{id}/alert");
        tokio::spawn(async move {
            let resp = client.get(&url).send().await.unwrap();
            let correlation = resp
                .headers()
                .get(CORRELATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap()
                .to_string();
            (resp.status().as_u16(), correlation)
        })
    });

    let mut ids = HashSet::new();
    for handle in requests.collect::<Vec<_>>() {
        let (status, correlation) = handle.await.unwrap();
        assert_eq!(status, 404);
        assert!(ids.insert(correlation), "correlation id shared across requests");
    }
    assert_eq!(ids.len(), 100);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn repeated_alert_key_aggregates_into_one_report() {
    let (addr, _, _, shutdown) = start_memory_server().await;

    let client = reqwest::Client::new();
    let mut report_ids = HashSet::new();
    for _ in 0..2 {
        let receipt: Value = client
            .post(format!("http://{addr}/alert"))
            .json(&sample_alert())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        report_ids.insert(receipt["report_id"].as_str().unwrap().to_string());
    }
    assert_eq!(report_ids.len(), 1);

    let report_id = report_ids.iter().next().unwrap();
    let alerts: Value = client
        .get(format!("http://{addr}/report/{report_id}/alert"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(alerts.as_array().unwrap().len(), 2);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn attribute_type_survives_the_wire() {
    let (addr, _, _, shutdown) = start_memory_server().await;

    let client = reqwest::Client::new();
    let receipt: Value = client
        .post(format!("http://{addr}/alert"))
        .json(&sample_alert())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let report_id = receipt["report_id"].as_str().unwrap();

    let attributes: Vec<Attribute> = client
        .get(format!("http://{addr}/report/{report_id}/attribute"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(attributes[0].attr_type, AttributeType::Ipaddr);

    let _ = shutdown.send(());
}
