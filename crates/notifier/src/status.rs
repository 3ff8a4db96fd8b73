//! Event classification and status-vocabulary mapping.
//!
//! Two kinds of notification are relevant:
//!
//! - pipeline execution state changes, and
//! - action execution state changes of a manual approval action.
//!
//! Everything else is ignored without error. For relevant events the raw
//! lifecycle state is mapped onto GitHub's three-value commit state.

use serde::{Deserialize, Serialize};

use crate::event::{EventKind, PipelineNotification};
use crate::{ExecutionId, NotifierError, PipelineName};

/// Suffix appended to the description while a manual approval is pending.
pub const AWAITING_APPROVAL_SUFFIX: &str = " is awaiting manual approval";

/// GitHub commit status state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    Success,
    Pending,
    Error,
}

impl CommitState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which mapping table applies to a relevant event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Pipeline-level state change.
    Pipeline,
    /// State change of a manual approval action.
    ManualApproval,
}

/// Decides whether a notification is relevant.
///
/// An action event without a `type` block cannot be a manual approval and is
/// ignored like any other action.
pub fn classify(notification: &PipelineNotification) -> Option<EventScope> {
    match notification.kind() {
        EventKind::PipelineExecutionStateChange => Some(EventScope::Pipeline),
        EventKind::ActionExecutionStateChange
            if notification
                .action_type()
                .is_some_and(|action| action.is_manual_approval()) =>
        {
            Some(EventScope::ManualApproval)
        }
        _ => None,
    }
}

/// Maps a raw lifecycle state onto a commit state. Comparison is case-insensitive.
///
/// A manual approval action *starting* means every upstream stage succeeded, so
/// it reports success; the action *succeeding* means the pipeline resumed, so it
/// reports pending.
pub fn map_state(scope: EventScope, raw_state: &str) -> CommitState {
    let normalized = raw_state.to_uppercase();
    match scope {
        EventScope::ManualApproval => match normalized.as_str() {
            "STARTED" => CommitState::Success,
            "SUCCEEDED" => CommitState::Pending,
            _ => CommitState::Error,
        },
        EventScope::Pipeline => match normalized.as_str() {
            "SUCCEEDED" => CommitState::Success,
            "STARTED" | "STOPPING" | "STOPPED" | "SUPERSEDED" | "RESUMED" => CommitState::Pending,
            _ => CommitState::Error,
        },
    }
}

/// Outcome of evaluating a relevant notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDecision {
    pub scope: EventScope,
    pub pipeline: PipelineName,
    pub execution_id: ExecutionId,
    pub state: CommitState,
    /// The manual approval gate has just been reached.
    pub awaiting_approval: bool,
}

impl StatusDecision {
    /// Human-readable status description.
    pub fn description(&self) -> String {
        if self.awaiting_approval {
            format!("{}{AWAITING_APPROVAL_SUFFIX}", self.pipeline)
        } else {
            self.pipeline.to_string()
        }
    }
}

/// Classifies a notification and computes its commit state.
///
/// Returns `Ok(None)` for irrelevant events. A relevant event must carry a
/// pipeline name, an execution id and a state.
pub fn evaluate(notification: &PipelineNotification) -> Result<Option<StatusDecision>, NotifierError> {
    let Some(scope) = classify(notification) else {
        return Ok(None);
    };

    let detail = notification
        .detail
        .as_ref()
        .ok_or(NotifierError::MalformedEvent { field: "detail" })?;

    let pipeline = detail
        .pipeline
        .clone()
        .and_then(PipelineName::new)
        .ok_or(NotifierError::MalformedEvent {
            field: "detail.pipeline",
        })?;
    let execution_id = detail
        .execution_id
        .clone()
        .and_then(ExecutionId::new)
        .ok_or(NotifierError::MalformedEvent {
            field: "detail.execution-id",
        })?;
    let raw_state = detail
        .state
        .as_deref()
        .ok_or(NotifierError::MalformedEvent {
            field: "detail.state",
        })?;

    let awaiting_approval =
        scope == EventScope::ManualApproval && raw_state.eq_ignore_ascii_case("STARTED");

    Ok(Some(StatusDecision {
        scope,
        pipeline,
        execution_id,
        state: map_state(scope, raw_state),
        awaiting_approval,
    }))
}
