//! Commit resolution: pipeline execution → (repository, commit).
//!
//! Only the first artifact revision is consulted. Pipelines with several source
//! artifacts report against whichever one the orchestrator lists first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::ExecutionLookup;
use crate::revision::RevisionUrl;
use crate::{CommitSha, ExecutionId, NotifierError, PipelineName, RepositoryId};

/// One source artifact version consumed by an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRevision {
    /// Commit id (`revisionId`).
    #[serde(rename = "revisionId", default)]
    pub revision_id: Option<String>,
    /// Provider-specific URL encoding the repository (`revisionUrl`).
    #[serde(rename = "revisionUrl", default)]
    pub revision_url: Option<String>,
}

/// The commit a pipeline execution built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCommit {
    pub repository: RepositoryId,
    pub commit: CommitSha,
}

/// Looks up `execution_id` and derives its source repository and commit.
pub async fn resolve_commit(
    lookup: &dyn ExecutionLookup,
    pipeline: &PipelineName,
    execution_id: &ExecutionId,
) -> Result<SourceCommit, NotifierError> {
    let revisions = lookup.artifact_revisions(pipeline, execution_id).await?;

    let first = revisions
        .into_iter()
        .next()
        .ok_or_else(|| NotifierError::NoArtifactRevisions {
            pipeline: pipeline.to_string(),
            execution_id: execution_id.to_string(),
        })?;

    source_commit_from_revision(&first)
}

/// Converts a single artifact revision into a [`SourceCommit`].
pub fn source_commit_from_revision(revision: &ArtifactRevision) -> Result<SourceCommit, NotifierError> {
    let commit = revision
        .revision_id
        .clone()
        .and_then(CommitSha::new)
        .ok_or(NotifierError::MalformedRevision {
            field: "revisionId",
        })?;
    let url = revision
        .revision_url
        .as_deref()
        .ok_or(NotifierError::MalformedRevision {
            field: "revisionUrl",
        })?;

    let repository = RevisionUrl::detect(url).repository_id()?;
    debug!(%repository, %commit, revision_url = url, "resolved source commit");

    Ok(SourceCommit { repository, commit })
}
