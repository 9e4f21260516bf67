//! AWS Step Functions [`WorkflowClient`] implementation.
//!
//! Starts one state-machine execution per accepted alert. The state
//! machine ARN is fixed at construction; the execution name and payload
//! come from the caller.
//!
//! # CLI arguments
//!
//! | Flag                  | Env var             | Default       |
//! |-----------------------|---------------------|---------------|
//! | `--state-machine-arn` | `STATE_MACHINE_ARN` | *(required)*  |
//! | `--sfn-region`        | `SFN_REGION`        | `us-east-1`   |

use async_trait::async_trait;
use aws_sdk_sfn::Client;

use super::{ExecutionInput, ExecutionOutput, WorkflowClient, WorkflowError};

pub struct StatesWorkflowClient {
    client: Client,
    state_machine_arn: String,
}

impl StatesWorkflowClient {
    pub async fn new(state_machine_arn: &str, region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            state_machine_arn: state_machine_arn.to_string(),
        }
    }
}

#[async_trait]
impl WorkflowClient for StatesWorkflowClient {
    fn name(&self) -> &'static str {
        "step-functions"
    }

    async fn start_execution(
        &self,
        input: ExecutionInput,
    ) -> Result<ExecutionOutput, WorkflowError> {
        let payload = serde_json::to_string(&input.input)?;

        let output = self
            .client
            .start_execution()
            .state_machine_arn(&self.state_machine_arn)
            .name(&input.name)
            .input(payload)
            .send()
            .await
            .map_err(|e| WorkflowError::Invoke {
                source: Box::new(e),
            })?;

        Ok(ExecutionOutput {
            execution_id: Some(output.execution_arn().to_string()),
        })
    }
}
