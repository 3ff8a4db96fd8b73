//! Outbound commit status payload.

use serde::{Deserialize, Serialize};

use crate::status::{CommitState, StatusDecision};
use crate::{AwsRegion, ExecutionId, PipelineName};

/// Fixed `context` label identifying this integration on the commit.
pub const STATUS_CONTEXT: &str = "CodePipeline";

/// Body of `POST /repos/{owner}/{repo}/statuses/{sha}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub state: CommitState,
    pub context: String,
    pub description: String,
    pub target_url: String,
}

impl StatusPayload {
    /// Builds the payload for a decision, linking back to the execution in the
    /// CodePipeline console of `region`.
    pub fn for_decision(decision: &StatusDecision, region: &AwsRegion) -> Self {
        Self {
            state: decision.state,
            context: STATUS_CONTEXT.to_string(),
            description: decision.description(),
            target_url: console_url(region, &decision.pipeline, &decision.execution_id),
        }
    }
}

/// Deep link to one execution in the CodePipeline console.
pub fn console_url(region: &AwsRegion, pipeline: &PipelineName, execution_id: &ExecutionId) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/codesuite/codepipeline/pipelines/{pipeline}/executions/{execution_id}?region={region}"
    )
}
