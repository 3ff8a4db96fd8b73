//! Error types for the notifier domain.
//!
//! [`NotifierError`] covers every condition that fails the current invocation.
//! The hosting event-delivery mechanism owns redelivery; nothing here retries.
//!
//! Port-level errors ([`LookupError`], [`PublishError`]) are produced by the
//! infrastructure adapters and surface through [`NotifierError`] where they are
//! fatal. Publish errors are never fatal: see [`crate::handler`].

use thiserror::Error;

// ---------------------------------------------------------------------------
// Invocation-level errors
// ---------------------------------------------------------------------------

/// Errors that fail the processing of a single notification.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The SNS message body was not a JSON pipeline notification.
    #[error("Notification is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A relevant notification is missing a field required to post a status.
    #[error("Notification is missing required field '{field}'")]
    MalformedEvent {
        /// Dotted path of the missing field (e.g. `"detail.execution-id"`).
        field: &'static str,
    },

    /// The execution lookup failed.
    #[error("Execution lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// The execution has no artifact revisions to attribute the status to.
    #[error("Execution '{execution_id}' of pipeline '{pipeline}' has no artifact revisions")]
    NoArtifactRevisions {
        /// Pipeline that was looked up.
        pipeline: String,
        /// Execution that was looked up.
        execution_id: String,
    },

    /// The first artifact revision lacks its commit id or URL.
    #[error("Artifact revision is missing '{field}'")]
    MalformedRevision {
        /// Name of the absent field (`"revisionId"` or `"revisionUrl"`).
        field: &'static str,
    },

    /// No repository identifier could be extracted from the revision URL.
    #[error("Cannot derive a repository from revision URL '{url}'")]
    MalformedRevisionUrl {
        /// The URL as returned by the lookup.
        url: String,
    },

    /// Startup configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Failure of the execution-metadata lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The pipeline or the execution does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Service-provided description.
        message: String,
    },

    /// The caller lacks permission to read the execution.
    #[error("access denied: {message}")]
    AccessDenied {
        /// Service-provided description.
        message: String,
    },

    /// Any other service or transport fault.
    #[error("service error: {message}")]
    Service {
        /// Service-provided description.
        message: String,
    },
}

/// Failure to deliver a status to the external platform.
///
/// A non-2xx HTTP response is *not* a [`PublishError`]; it is returned as a
/// normal [`crate::PublishResponse`].
#[derive(Debug, Error)]
pub enum PublishError {
    /// The request could not be sent or its response could not be read.
    #[error("transport failure: {message}")]
    Transport {
        /// Underlying transport error text.
        message: String,
    },

    /// The status payload could not be serialised.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
