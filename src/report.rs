//! Serde data structures for alerts and report artifacts.
//!
//! Contains [`ReportId`], [`Alert`], [`Attribute`], [`Section`], and
//! [`AlertReceipt`]. An alert is the unit of submission; a report is the
//! aggregation target keyed by [`ReportId`] that enrichment attaches
//! sections and attributes to.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an enrichment report, UUID-backed.
///
/// Stored and serialized as a plain string; [`ReportId::parse`] is the
/// syntactic gate used by the API handlers before touching the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validate that `raw` is a well-formed report identifier.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(|u| Self(u.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An alert submitted by a detector for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Alert {
    /// Name of the detection system that produced the alert.
    pub detector: String,

    /// Rule that fired within the detector.
    pub rule_name: String,

    /// Aggregation key: alerts sharing `(detector, alert_key)` attach to
    /// the same report.
    pub alert_key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

/// An observable attached to an alert or derived by enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,

    pub key: String,

    pub value: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Ipaddr,
    Domain,
    Username,
    Filehash,
    Url,
}

/// A finding block written into a report by an enrichment step.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Enrichment source that authored the section.
    pub author: String,

    pub title: String,

    /// Free-form finding payload; the API serves it verbatim.
    pub content: serde_json::Value,
}

/// Response body for an accepted alert submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AlertReceipt {
    pub report_id: ReportId,
}
