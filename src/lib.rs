//! Alertdesk is the HTTP boundary of a small alert-enrichment service.
//!
//! Detectors submit alerts over HTTP; alerts aggregate into reports that
//! an asynchronous enrichment workflow decorates with sections and
//! attributes, all served back by report identifier. Every request is
//! assigned a correlation identifier that is logged server-side and
//! returned in the `x-correlation-id` response header, so callers can
//! tie a failure to the exact log lines that produced it.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health,
//!   workflow-failure).
//! - [`api`] -- Handlers for the alert/report endpoints and the
//!   responder, the single function that writes wire responses.
//! - [`middleware`] -- Correlation middleware and the per-request
//!   [`RequestContext`](middleware::RequestContext).
//! - [`backend`] -- The [`ReportBackend`](backend::ReportBackend) seam
//!   the handlers delegate to, with an in-memory reference
//!   implementation.
//! - [`workflow`] -- Enrichment orchestrator client, its recording test
//!   double, and the workflow failure intake.
//! - [`report`] -- Alert and report-artifact data model.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime
//!   diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print
//!   output.
//! - [`server`] -- Axum server setup, shared application state, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sfn` | AWS Step Functions orchestrator client |
//! | `sentry-integration` | Sentry error tracking |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod backend;
pub mod cli;
pub mod cmd;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod report;
pub mod server;
pub mod workflow;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
