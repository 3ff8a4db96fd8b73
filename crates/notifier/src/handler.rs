//! Per-notification processing.
//!
//! `classify → resolve commit → build payload → publish`. Irrelevant events stop
//! after classification and make no external calls. Delivery to GitHub is
//! fire-and-forget: transport failures and non-2xx responses are logged and the
//! invocation still succeeds.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::event::PipelineNotification;
use crate::payload::StatusPayload;
use crate::ports::{ExecutionLookup, StatusPublisher};
use crate::resolver::resolve_commit;
use crate::status::{evaluate, CommitState};
use crate::{CommitSha, NotifierConfig, NotifierError, RepositoryId};

/// What the handler did with one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The event kind is not reported to GitHub.
    Ignored,
    /// A status was sent.
    Published {
        repository: RepositoryId,
        commit: CommitSha,
        state: CommitState,
        /// HTTP status of the response; `None` when the request never completed.
        response_status: Option<u16>,
    },
}

pub struct NotificationHandler {
    config: Arc<NotifierConfig>,
    lookup: Arc<dyn ExecutionLookup>,
    publisher: Arc<dyn StatusPublisher>,
}

impl NotificationHandler {
    pub fn new(
        config: Arc<NotifierConfig>,
        lookup: Arc<dyn ExecutionLookup>,
        publisher: Arc<dyn StatusPublisher>,
    ) -> Self {
        Self {
            config,
            lookup,
            publisher,
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Parses an SNS message body and handles it.
    pub async fn handle_message(&self, message: &str) -> Result<HandleOutcome, NotifierError> {
        debug!(raw = message, "received notification");
        let notification = PipelineNotification::from_json(message)?;
        self.handle(&notification).await
    }

    #[instrument(skip_all, fields(detail_type = notification.detail_type.as_deref().unwrap_or_default()))]
    pub async fn handle(
        &self,
        notification: &PipelineNotification,
    ) -> Result<HandleOutcome, NotifierError> {
        let Some(decision) = evaluate(notification)? else {
            debug!("notification is not relevant, ignoring");
            return Ok(HandleOutcome::Ignored);
        };

        let source = resolve_commit(
            self.lookup.as_ref(),
            &decision.pipeline,
            &decision.execution_id,
        )
        .await?;

        let payload = StatusPayload::for_decision(&decision, &self.config.region);

        info!(
            pipeline = %decision.pipeline,
            execution_id = %decision.execution_id,
            repository = %source.repository,
            commit = %source.commit,
            state = %payload.state,
            "posting commit status"
        );

        let response_status = match self
            .publisher
            .publish(&source.repository, &source.commit, &payload)
            .await
        {
            Ok(response) => {
                if response.is_success() {
                    info!(status = response.status, body = %response.body, "commit status accepted");
                } else {
                    warn!(status = response.status, body = %response.body, "commit status rejected");
                }
                Some(response.status)
            }
            Err(err) => {
                warn!(error = %err, "commit status could not be delivered");
                None
            }
        };

        Ok(HandleOutcome::Published {
            repository: source.repository,
            commit: source.commit,
            state: payload.state,
            response_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PublishResponse;
    use crate::resolver::ArtifactRevision;
    use crate::{AccessToken, AwsRegion, ExecutionId, LookupError, PipelineName, PublishError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingLookup {
        calls: AtomicUsize,
        revisions: Vec<ArtifactRevision>,
    }

    #[async_trait]
    impl ExecutionLookup for CountingLookup {
        async fn artifact_revisions(
            &self,
            _pipeline: &PipelineName,
            _execution_id: &ExecutionId,
        ) -> Result<Vec<ArtifactRevision>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.revisions.clone())
        }
    }

    type Posted = (RepositoryId, CommitSha, StatusPayload);

    struct RecordingPublisher {
        posted: Mutex<Vec<Posted>>,
        status: Option<u16>,
    }

    impl RecordingPublisher {
        fn replying(status: Option<u16>) -> Self {
            Self {
                posted: Mutex::new(Vec::new()),
                status,
            }
        }
    }

    #[async_trait]
    impl StatusPublisher for RecordingPublisher {
        async fn publish(
            &self,
            repository: &RepositoryId,
            commit: &CommitSha,
            payload: &StatusPayload,
        ) -> Result<PublishResponse, PublishError> {
            self.posted
                .lock()
                .unwrap()
                .push((repository.clone(), commit.clone(), payload.clone()));
            match self.status {
                Some(status) => Ok(PublishResponse {
                    status,
                    body: "{}".into(),
                }),
                None => Err(PublishError::Transport {
                    message: "connection reset".into(),
                }),
            }
        }
    }

    fn config() -> Arc<NotifierConfig> {
        Arc::new(NotifierConfig {
            access_token: AccessToken::new("t").unwrap(),
            region: AwsRegion::new("us-east-1").unwrap(),
            github_api_url: "https://api.github.com".into(),
        })
    }

    fn lookup_with_commit(commit: &str) -> Arc<CountingLookup> {
        Arc::new(CountingLookup {
            calls: AtomicUsize::new(0),
            revisions: vec![ArtifactRevision {
                revision_id: Some(commit.into()),
                revision_url: Some(format!(
                    "https://console.aws.amazon.com/?FullRepositoryId=acme/widgets&Commit={commit}"
                )),
            }],
        })
    }

    fn handler(
        lookup: Arc<CountingLookup>,
        publisher: Arc<RecordingPublisher>,
    ) -> NotificationHandler {
        NotificationHandler::new(config(), lookup, publisher)
    }

    const PIPELINE_SUCCEEDED: &str = r#"{
        "detailType": "CodePipeline Pipeline Execution State Change",
        "detail": { "pipeline": "web-deploy", "execution-id": "exec-1", "state": "SUCCEEDED" }
    }"#;

    #[tokio::test]
    async fn irrelevant_event_makes_no_external_calls() {
        let lookup = lookup_with_commit("abc123");
        let publisher = Arc::new(RecordingPublisher::replying(Some(201)));
        let handler = handler(lookup.clone(), publisher.clone());

        let outcome = handler
            .handle_message(
                r#"{
                    "detailType": "CodePipeline Stage Execution State Change",
                    "detail": { "pipeline": "web-deploy", "execution-id": "exec-1", "state": "FAILED" }
                }"#,
            )
            .await
            .unwrap();

        assert_eq!(outcome, HandleOutcome::Ignored);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
        assert!(publisher.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pipeline_success_is_posted_against_first_revision() {
        let lookup = lookup_with_commit("abc123");
        let publisher = Arc::new(RecordingPublisher::replying(Some(201)));
        let handler = handler(lookup.clone(), publisher.clone());

        let outcome = handler.handle_message(PIPELINE_SUCCEEDED).await.unwrap();

        assert_eq!(
            outcome,
            HandleOutcome::Published {
                repository: RepositoryId::new("acme/widgets").unwrap(),
                commit: CommitSha::new("abc123").unwrap(),
                state: CommitState::Success,
                response_status: Some(201),
            }
        );

        let posted = publisher.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        let (repository, commit, payload) = &posted[0];
        assert_eq!(repository.as_str(), "acme/widgets");
        assert_eq!(commit.as_str(), "abc123");
        assert_eq!(payload.context, "CodePipeline");
        assert_eq!(payload.description, "web-deploy");
        assert_eq!(
            payload.target_url,
            "https://us-east-1.console.aws.amazon.com/codesuite/codepipeline/pipelines/web-deploy/executions/exec-1?region=us-east-1"
        );
    }

    #[tokio::test]
    async fn approval_gate_is_reported_as_awaiting_approval() {
        let lookup = lookup_with_commit("abc123");
        let publisher = Arc::new(RecordingPublisher::replying(Some(201)));
        let handler = handler(lookup, publisher.clone());

        handler
            .handle_message(
                r#"{
                    "detailType": "CodePipeline Action Execution State Change",
                    "detail": {
                        "pipeline": "web-deploy", "execution-id": "exec-1", "state": "started",
                        "type": { "owner": "AWS", "provider": "Manual", "category": "Approval" }
                    }
                }"#,
            )
            .await
            .unwrap();

        let posted = publisher.posted.lock().unwrap();
        let (_, _, payload) = &posted[0];
        assert_eq!(payload.state, CommitState::Success);
        assert_eq!(payload.description, "web-deploy is awaiting manual approval");
    }

    #[tokio::test]
    async fn rejected_status_does_not_fail_invocation() {
        let publisher = Arc::new(RecordingPublisher::replying(Some(422)));
        let handler = handler(lookup_with_commit("abc123"), publisher);

        let outcome = handler.handle_message(PIPELINE_SUCCEEDED).await.unwrap();
        assert!(matches!(
            outcome,
            HandleOutcome::Published {
                response_status: Some(422),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn transport_failure_does_not_fail_invocation() {
        let publisher = Arc::new(RecordingPublisher::replying(None));
        let handler = handler(lookup_with_commit("abc123"), publisher);

        let outcome = handler.handle_message(PIPELINE_SUCCEEDED).await.unwrap();
        assert!(matches!(
            outcome,
            HandleOutcome::Published {
                response_status: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_revisions_fail_invocation_before_publishing() {
        let lookup = Arc::new(CountingLookup::default());
        let publisher = Arc::new(RecordingPublisher::replying(Some(201)));
        let handler = handler(lookup, publisher.clone());

        let err = handler.handle_message(PIPELINE_SUCCEEDED).await.unwrap_err();
        assert!(matches!(err, NotifierError::NoArtifactRevisions { .. }));
        assert!(publisher.posted.lock().unwrap().is_empty());
    }
}
