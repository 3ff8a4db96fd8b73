//! Inbound pipeline notification model.
//!
//! CodePipeline notification rules publish a JSON document to SNS; the SNS
//! message body is deserialised into [`PipelineNotification`]. Every field is
//! optional at this level: an irrelevant event may carry a completely different
//! `detail` shape, and only relevant events are required to be complete (see
//! [`crate::status::evaluate`]).

use serde::{Deserialize, Serialize};

use crate::NotifierError;

/// Detail type of a pipeline-level state change.
pub const PIPELINE_EXECUTION_STATE_CHANGE: &str = "CodePipeline Pipeline Execution State Change";
/// Detail type of an action-level state change.
pub const ACTION_EXECUTION_STATE_CHANGE: &str = "CodePipeline Action Execution State Change";
/// Detail type of a stage-level state change.
pub const STAGE_EXECUTION_STATE_CHANGE: &str = "CodePipeline Stage Execution State Change";

/// One notification as published by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineNotification {
    /// Kind of event, e.g. [`PIPELINE_EXECUTION_STATE_CHANGE`].
    #[serde(rename = "detailType", default)]
    pub detail_type: Option<String>,

    /// Event-specific payload.
    #[serde(default)]
    pub detail: Option<NotificationDetail>,
}

/// The `detail` block of a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDetail {
    #[serde(default)]
    pub pipeline: Option<String>,

    #[serde(rename = "execution-id", default)]
    pub execution_id: Option<String>,

    /// Raw lifecycle state (`STARTED`, `SUCCEEDED`, `FAILED`, ...).
    #[serde(default)]
    pub state: Option<String>,

    /// Present on action-level events only.
    #[serde(rename = "type", default)]
    pub action_type: Option<ActionType>,
}

/// The `detail.type` block of an action-level event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionType {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl ActionType {
    /// Returns `true` for the built-in "Wait for manual approval" action.
    pub fn is_manual_approval(&self) -> bool {
        self.provider.as_deref() == Some("Manual") && self.category.as_deref() == Some("Approval")
    }
}

/// Known event kinds, keyed on `detailType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PipelineExecutionStateChange,
    ActionExecutionStateChange,
    StageExecutionStateChange,
    /// Anything else, including an absent `detailType` (empty string).
    Other(String),
}

impl EventKind {
    pub fn from_detail_type(detail_type: &str) -> Self {
        match detail_type {
            PIPELINE_EXECUTION_STATE_CHANGE => Self::PipelineExecutionStateChange,
            ACTION_EXECUTION_STATE_CHANGE => Self::ActionExecutionStateChange,
            STAGE_EXECUTION_STATE_CHANGE => Self::StageExecutionStateChange,
            other => Self::Other(other.to_string()),
        }
    }
}

impl PipelineNotification {
    /// Parses an SNS message body.
    pub fn from_json(message: &str) -> Result<Self, NotifierError> {
        Ok(serde_json::from_str(message)?)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from_detail_type(self.detail_type.as_deref().unwrap_or_default())
    }

    /// Returns the action type block, if this event carries one.
    pub fn action_type(&self) -> Option<&ActionType> {
        self.detail.as_ref().and_then(|d| d.action_type.as_ref())
    }
}
