//! CodePipeline execution metadata adapter.
//!
//! Implements [`notifier::ExecutionLookup`] with the `GetPipelineExecution`
//! operation of `aws-sdk-codepipeline`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Credentials, region resolution and SDK error
//! classification live here. The [`notifier`] crate sees only
//! [`notifier::ExecutionLookup`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_codepipeline::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_codepipeline::operation::get_pipeline_execution::{
    GetPipelineExecutionError, GetPipelineExecutionOutput,
};
use aws_sdk_codepipeline::Client;
use notifier::{ArtifactRevision, ExecutionId, ExecutionLookup, LookupError, PipelineName};
use tracing::{debug, instrument};

/// Execution lookup backed by the CodePipeline API.
#[derive(Debug, Clone)]
pub struct CodePipelineLookup {
    client: Client,
}

impl CodePipelineLookup {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS environment (Lambda role credentials,
    /// `AWS_REGION`).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ExecutionLookup for CodePipelineLookup {
    #[instrument(skip_all, fields(pipeline = %pipeline, execution_id = %execution_id))]
    async fn artifact_revisions(
        &self,
        pipeline: &PipelineName,
        execution_id: &ExecutionId,
    ) -> Result<Vec<ArtifactRevision>, LookupError> {
        let output = self
            .client
            .get_pipeline_execution()
            .pipeline_name(pipeline.as_str())
            .pipeline_execution_id(execution_id.as_str())
            .send()
            .await
            .map_err(lookup_error)?;

        let revisions = revisions_from_output(&output);
        debug!(count = revisions.len(), "fetched artifact revisions");
        Ok(revisions)
    }
}

/// Extracts the artifact revisions of an execution; an absent execution yields
/// an empty list.
pub fn revisions_from_output(output: &GetPipelineExecutionOutput) -> Vec<ArtifactRevision> {
    output
        .pipeline_execution()
        .map(|execution| {
            execution
                .artifact_revisions()
                .iter()
                .map(|revision| ArtifactRevision {
                    revision_id: revision.revision_id().map(str::to_owned),
                    revision_url: revision.revision_url().map(str::to_owned),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn lookup_error(err: SdkError<GetPipelineExecutionError>) -> LookupError {
    let message = DisplayErrorContext(&err).to_string();
    match err.as_service_error() {
        Some(service)
            if service.is_pipeline_not_found_exception()
                || service.is_pipeline_execution_not_found_exception() =>
        {
            LookupError::NotFound { message }
        }
        Some(service) if service.code() == Some("AccessDeniedException") => {
            LookupError::AccessDenied { message }
        }
        _ => LookupError::Service { message },
    }
}
