//! The single chokepoint turning handler outcomes into wire responses.
//!
//! Every API handler funnels its result through [`respond`]; nothing
//! else writes to the transport. The three shapes — success, domain
//! error, unclassified error — are matched exhaustively, and every
//! response is stamped with the request's correlation identifier.

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{RequestContext, X_CORRELATION_ID};

pub fn respond<T: Serialize>(ctx: &RequestContext, result: Result<T, ApiError>) -> Response {
    let stats = &ctx.state().stats;

    let mut response = match result {
        Ok(value) => {
            stats.succeeded.fetch_add(1, Ordering::Relaxed);
            (StatusCode::OK, Json(value)).into_response()
        }

        // Unclassified: full detail to the log, only a marker to the caller
        Err(ApiError::Internal(source)) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                correlation_id = %ctx.correlation_id(),
                error = %source,
                "api error (unclassified)"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "SystemError" })),
            )
                .into_response()
        }

        Err(
            domain @ (ApiError::ReportNotFound(_)
            | ApiError::InvalidReportId { .. }
            | ApiError::InvalidAlert(_)),
        ) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            let status = domain.status_code();
            tracing::error!(
                correlation_id = %ctx.correlation_id(),
                status = status.as_u16(),
                message = %domain,
                "api error"
            );
            (status, Json(json!({ "error": domain.body() }))).into_response()
        }
    };

    response
        .headers_mut()
        .insert(X_CORRELATION_ID.clone(), ctx.header_value());
    response
}
