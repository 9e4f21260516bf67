//! Correlation middleware: per-request identity and dependency access.
//!
//! [`correlation`] runs before every handler. It mints a fresh
//! correlation identifier, builds the immutable [`RequestContext`]
//! handlers read their dependencies from, logs the inbound request, and
//! guarantees the `x-correlation-id` response header is present even on
//! responses that never reach the responder (extractor rejections, the
//! 404 fallback).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::USER_AGENT;
use http::{HeaderName, HeaderValue};
use uuid::Uuid;

use crate::backend::ReportBackend;
use crate::server::AppState;

/// Response header carrying the per-request correlation identifier.
pub static X_CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

/// Per-request state, created once by [`correlation`] and carried in
/// the request extensions.
///
/// Holds the minted correlation identifier and the process-wide
/// [`AppState`] handle. Handlers receive it as an `Extension` argument;
/// since the router cannot be built without an `AppState`, a request
/// without its dependencies is unrepresentable.
#[derive(Clone)]
pub struct RequestContext {
    correlation_id: String,
    state: Arc<AppState>,
}

impl RequestContext {
    fn new(state: Arc<AppState>) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            state,
        }
    }

    #[must_use]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    #[must_use]
    pub fn backend(&self) -> &dyn ReportBackend {
        self.state.backend.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub(crate) fn header_value(&self) -> HeaderValue {
        // A UUID string is always a valid header value
        HeaderValue::from_str(&self.correlation_id)
            .unwrap_or_else(|_| HeaderValue::from_static("unset"))
    }
}

/// Capture `{name}` segments of the matched template against the
/// request path.
fn path_params(template: &str, path: &str) -> String {
    template
        .split('/')
        .zip(path.split('/'))
        .filter_map(|(t, p)| {
            t.strip_prefix('{')
                .and_then(|t| t.strip_suffix('}'))
                .map(|name| format!("{name}={p}"))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Middleware layered over every route (fallback included).
pub async fn correlation(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new(state);

    let uri_path = req.uri().path().to_string();
    let matched = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());
    let params = matched
        .as_deref()
        .map(|template| path_params(template, &uri_path))
        .unwrap_or_default();
    let path = matched.unwrap_or(uri_path);
    let ua = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    tracing::info!(
        path = %path,
        params = %params,
        query = %req.uri().query().unwrap_or(""),
        correlation_id = %ctx.correlation_id,
        remote = %addr,
        ua = %ua,
        "api request"
    );

    req.extensions_mut().insert(ctx.clone());
    let mut response = next.run(req).await;

    // The responder stamps this header itself; cover everything else.
    if !response.headers().contains_key(&X_CORRELATION_ID) {
        response
            .headers_mut()
            .insert(X_CORRELATION_ID.clone(), ctx.header_value());
    }

    response
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::server::Stats;
    use crate::workflow::RecordingWorkflowClient;

    fn app_state() -> Arc<AppState> {
        let workflow = Arc::new(RecordingWorkflowClient::new());
        Arc::new(AppState {
            backend: Arc::new(crate::backend::memory::MemoryBackend::new(workflow.clone())),
            workflow,
            start_time: Instant::now(),
            stats: Stats::new(),
        })
    }

    #[test]
    fn contexts_mint_distinct_identifiers() {
        let state = app_state();
        let a = RequestContext::new(state.clone());
        let b = RequestContext::new(state);
        assert_ne!(a.correlation_id(), b.correlation_id());
    }

    #[test]
    fn correlation_id_is_a_valid_header_value() {
        let ctx = RequestContext::new(app_state());
        assert_eq!(ctx.header_value().to_str().unwrap(), ctx.correlation_id());
    }

    #[test]
    fn params_captured_from_template() {
        assert_eq!(
            path_params("/report/{report_id}/alert", "/report/abc123/alert"),
            "report_id=abc123"
        );
        assert_eq!(path_params("/alert", "/alert"), "");
    }
}
