//! `alertdesk workflow-failure` — log a failure event from the
//! enrichment workflow.
//!
//! The orchestration layer invokes this entry point when an enrichment
//! execution fails. The event is opaque; it is logged once through
//! [`workflow::record_failure`](crate::workflow::record_failure) and
//! the command succeeds regardless of the event's shape — a malformed
//! or empty payload is still a payload worth logging.

use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::cli::WorkflowFailureArgs;
use crate::error::AlertdeskError;
use crate::logging;
use crate::workflow;

pub async fn execute(args: WorkflowFailureArgs) -> Result<(), AlertdeskError> {
    let log_format = logging::resolve_format(false, args.json);
    logging::init(&args.log_level, log_format);

    let raw = match args.event {
        Some(event) => event,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    // Non-JSON input is still an event; log it as a string
    let event = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
    workflow::record_failure(&event);

    Ok(())
}
