//! Port traits implemented by infrastructure crates.
//!
//! The handler depends only on these traits. `codepipeline` supplies the
//! [`ExecutionLookup`], `github` supplies the [`StatusPublisher`]; tests supply
//! in-memory fakes.

use async_trait::async_trait;

use crate::payload::StatusPayload;
use crate::resolver::ArtifactRevision;
use crate::{CommitSha, ExecutionId, LookupError, PipelineName, PublishError, RepositoryId};

/// Reads execution metadata from the orchestrator.
#[async_trait]
pub trait ExecutionLookup: Send + Sync {
    /// Returns the artifact revisions of one execution, in the order the
    /// orchestrator reports them.
    async fn artifact_revisions(
        &self,
        pipeline: &PipelineName,
        execution_id: &ExecutionId,
    ) -> Result<Vec<ArtifactRevision>, LookupError>;
}

/// Posts a commit status to the code-review platform.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Sends `payload` for `commit` in `repository`.
    ///
    /// Any HTTP response, successful or not, is `Ok`. Only failing to send the
    /// request at all is an error.
    async fn publish(
        &self,
        repository: &RepositoryId,
        commit: &CommitSha,
        payload: &StatusPayload,
    ) -> Result<PublishResponse, PublishError>;
}

/// Raw response from the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text; logged, never interpreted.
    pub body: String,
}

impl PublishResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
