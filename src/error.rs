//! Unified error types for alertdesk.
//!
//! Defines [`AlertdeskError`] (startup and CLI failures) and
//! [`ApiError`] (the request-level taxonomy the responder collapses
//! into wire responses). Both use `thiserror` for `Display` and `Error`
//! derives.

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::backend::BackendError;
use crate::report::ReportId;

/// Failures outside the request path: binding the listener, driving a
/// subcommand, talking to a running instance.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AlertdeskError {
    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

/// What a handler can hand the responder instead of a success value.
///
/// The first three variants are domain errors: fully described to the
/// caller with their own status code and structured payload. `Internal`
/// is the unclassified bucket: logged server-side in full, surfaced to
/// the caller only as `"SystemError"`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("report {0} not found")]
    ReportNotFound(ReportId),

    #[error("invalid report id {id:?}: {reason}")]
    InvalidReportId { id: String, reason: String },

    #[error("invalid alert: {0}")]
    InvalidAlert(String),

    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    pub(crate) fn invalid_report_id(id: &str, reason: impl ToString) -> Self {
        Self::InvalidReportId {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ReportNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidReportId { .. } | Self::InvalidAlert(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The payload placed under the `"error"` key of the response body.
    ///
    /// Internal detail never crosses the trust boundary: `Internal`
    /// collapses to the bare `"SystemError"` marker.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::ReportNotFound(id) => json!({
                "code": "report_not_found",
                "report_id": id,
                "message": self.to_string(),
            }),
            Self::InvalidReportId { id, .. } => json!({
                "code": "invalid_report_id",
                "report_id": id,
                "message": self.to_string(),
            }),
            Self::InvalidAlert(_) => json!({
                "code": "invalid_alert",
                "message": self.to_string(),
            }),
            Self::Internal(_) => json!("SystemError"),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::ReportNotFound(id) => Self::ReportNotFound(id),
            other => Self::Internal(Box::new(other)),
        }
    }
}
