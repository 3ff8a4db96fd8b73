//! Pipeline-to-commit-status domain.
//!
//! Receives CodePipeline state-change notifications, decides whether they are
//! worth reporting, resolves the commit an execution built, and hands a GitHub
//! commit status to a [`StatusPublisher`]. Infrastructure crates implement the
//! port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PipelineName`, `RepositoryId`, etc.) |
//! | [`event`] | Inbound notification model |
//! | [`status`] | Relevance test and status-vocabulary mapping |
//! | [`revision`] | Repository extraction from revision URLs |
//! | [`resolver`] | Execution → source commit resolution |
//! | [`payload`] | Outbound commit status payload |
//! | [`ports`] | `ExecutionLookup` and `StatusPublisher` traits |
//! | [`handler`] | Per-notification orchestration |
//! | [`config`] | Startup configuration |
//! | [`errors`] | Error types |

pub mod config;
pub mod errors;
pub mod event;
pub mod handler;
pub mod identifiers;
pub mod payload;
pub mod ports;
pub mod resolver;
pub mod revision;
pub mod status;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{AccessToken, NotifierConfig};
pub use errors::{LookupError, NotifierError, PublishError};
pub use event::{ActionType, EventKind, NotificationDetail, PipelineNotification};
pub use handler::{HandleOutcome, NotificationHandler};
pub use identifiers::{AwsRegion, CommitSha, ExecutionId, PipelineName, RepositoryId};
pub use payload::{StatusPayload, STATUS_CONTEXT};
pub use ports::{ExecutionLookup, PublishResponse, StatusPublisher};
pub use resolver::{resolve_commit, ArtifactRevision, SourceCommit};
pub use revision::RevisionUrl;
pub use status::{classify, evaluate, map_state, CommitState, EventScope, StatusDecision};
