//! API handlers for the alert and report endpoints.
//!
//! Four operations: alert submission and the three report-artifact
//! reads. Each handler validates its path parameter, delegates to the
//! report backend through the [`RequestContext`], and hands the outcome
//! to [`respond`] — handlers never write to the transport directly.
//! Routes are bound once in [`server::build_router`](crate::server::build_router).

pub mod respond;

use axum::extract::Path;
use axum::response::Response;
use axum::{Extension, Json};

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::report::{Alert, AlertReceipt, ReportId};
use respond::respond;

fn parse_report_id(raw: &str) -> Result<ReportId, ApiError> {
    ReportId::parse(raw).map_err(|e| ApiError::invalid_report_id(raw, e))
}

/// `POST /alert`
pub async fn submit_alert(
    Extension(ctx): Extension<RequestContext>,
    Json(alert): Json<Alert>,
) -> Response {
    let result = accept_alert(&ctx, alert).await;
    respond(&ctx, result)
}

async fn accept_alert(ctx: &RequestContext, alert: Alert) -> Result<AlertReceipt, ApiError> {
    if alert.detector.trim().is_empty() {
        return Err(ApiError::InvalidAlert("detector must not be empty".into()));
    }
    if alert.alert_key.trim().is_empty() {
        return Err(ApiError::InvalidAlert("alert_key must not be empty".into()));
    }

    let report_id = ctx.backend().submit_alert(alert).await?;
    Ok(AlertReceipt { report_id })
}

/// `GET /report/{report_id}/alert`
pub async fn report_alerts(
    Extension(ctx): Extension<RequestContext>,
    Path(report_id): Path<String>,
) -> Response {
    let result = match parse_report_id(&report_id) {
        Ok(id) => ctx.backend().alerts(&id).await.map_err(ApiError::from),
        Err(err) => Err(err),
    };
    respond(&ctx, result)
}

/// `GET /report/{report_id}/section`
pub async fn report_sections(
    Extension(ctx): Extension<RequestContext>,
    Path(report_id): Path<String>,
) -> Response {
    let result = match parse_report_id(&report_id) {
        Ok(id) => ctx.backend().sections(&id).await.map_err(ApiError::from),
        Err(err) => Err(err),
    };
    respond(&ctx, result)
}

/// `GET /report/{report_id}/attribute`
pub async fn report_attributes(
    Extension(ctx): Extension<RequestContext>,
    Path(report_id): Path<String>,
) -> Response {
    let result = match parse_report_id(&report_id) {
        Ok(id) => ctx.backend().attributes(&id).await.map_err(ApiError::from),
        Err(err) => Err(err),
    };
    respond(&ctx, result)
}
