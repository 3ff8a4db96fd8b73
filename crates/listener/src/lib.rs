//! Inbound event source.
//!
//! CodePipeline notification rules publish to an SNS topic; the topic invokes
//! this Lambda function with an [`SnsEnvelope`]. Each record's `Message` is a
//! JSON-encoded [`notifier::PipelineNotification`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Envelope decoding and the Lambda runtime loop live here.
//! The [`notifier`] crate sees only the message body.
//!
//! Redelivery is owned by SNS/Lambda: a failed record fails the invocation and
//! nothing is retried here.

use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use notifier::{CommitState, HandleOutcome, NotificationHandler, NotifierError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// SNS → Lambda invocation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsMessage {
    /// The notification JSON, as a string.
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "MessageId", default)]
    pub message_id: Option<String>,
    #[serde(rename = "TopicArn", default)]
    pub topic_arn: Option<String>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ListenerError {
    /// The invocation carried no SNS records.
    #[error("SNS envelope contains no records")]
    EmptyEnvelope,

    /// Processing one record failed.
    #[error("Record {message_id} failed: {source}")]
    Record {
        message_id: String,
        #[source]
        source: NotifierError,
    },
}

/// Function response: one entry per processed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationSummary {
    pub records: Vec<RecordOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Ignored {
        message_id: Option<String>,
    },
    Published {
        message_id: Option<String>,
        repository: String,
        commit: String,
        state: CommitState,
        response_status: Option<u16>,
    },
}

impl RecordOutcome {
    fn from_handled(message_id: Option<String>, outcome: HandleOutcome) -> Self {
        match outcome {
            HandleOutcome::Ignored => Self::Ignored { message_id },
            HandleOutcome::Published {
                repository,
                commit,
                state,
                response_status,
            } => Self::Published {
                message_id,
                repository: repository.to_string(),
                commit: commit.to_string(),
                state,
                response_status,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Handles every record of an envelope in order. The first failing record
/// aborts the invocation.
pub async fn dispatch(
    handler: &NotificationHandler,
    envelope: &SnsEnvelope,
) -> Result<InvocationSummary, ListenerError> {
    if envelope.records.is_empty() {
        return Err(ListenerError::EmptyEnvelope);
    }

    let mut records = Vec::with_capacity(envelope.records.len());
    for record in &envelope.records {
        let message_id = record.sns.message_id.clone();
        let outcome = handler
            .handle_message(&record.sns.message)
            .await
            .map_err(|source| ListenerError::Record {
                message_id: message_id.clone().unwrap_or_else(|| "<unknown>".to_string()),
                source,
            })?;
        records.push(RecordOutcome::from_handled(message_id, outcome));
    }

    Ok(InvocationSummary { records })
}

/// Runs the Lambda runtime loop until the runtime API goes away.
///
/// `on_complete` runs after every invocation, successful or not.
pub async fn serve<F>(handler: Arc<NotificationHandler>, on_complete: F) -> Result<(), lambda_runtime::Error>
where
    F: Fn() + Send + Sync + 'static,
{
    let on_complete = Arc::new(on_complete);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SnsEnvelope>| {
        let handler = Arc::clone(&handler);
        let on_complete = Arc::clone(&on_complete);
        async move {
            let result = invoke(&handler, event).await;
            on_complete();
            Ok::<_, lambda_runtime::Error>(result?)
        }
    }))
    .await
}

#[instrument(skip_all, fields(request_id = %event.context.request_id, records = event.payload.records.len()))]
async fn invoke(
    handler: &NotificationHandler,
    event: LambdaEvent<SnsEnvelope>,
) -> Result<InvocationSummary, ListenerError> {
    let summary = dispatch(handler, &event.payload).await?;
    info!(records = summary.records.len(), "invocation complete");
    Ok(summary)
}
