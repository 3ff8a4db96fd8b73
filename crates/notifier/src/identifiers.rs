//! Newtype domain identifiers.
//!
//! Every name that crosses a boundary (the inbound event, the execution lookup,
//! the outbound status URL) is a distinct newtype wrapping a `String`. This keeps
//! a [`PipelineName`] from being passed where an [`ExecutionId`] is expected even
//! though both are plain text on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Orchestrator-side identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// Name of a CodePipeline pipeline, as carried in `detail.pipeline`.
    PipelineName
}

string_id! {
    /// Identifier of one pipeline execution, as carried in `detail.execution-id`.
    ExecutionId
}

string_id! {
    /// AWS region the handler runs in (e.g. `"us-east-1"`).
    ///
    /// Only used to build the console deep link; never validated against a
    /// list of known regions.
    AwsRegion
}

// ---------------------------------------------------------------------------
// GitHub-side identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a GitHub repository in `"owner/repo"` format.
    RepositoryId
}

string_id! {
    /// A Git commit SHA, taken verbatim from the artifact revision.
    CommitSha
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_rejected() {
        assert!(PipelineName::new("").is_none());
        assert!(CommitSha::new(String::new()).is_none());
    }

    #[test]
    fn display_matches_inner_value() {
        let repo = RepositoryId::new("acme/widgets").unwrap();
        assert_eq!(repo.to_string(), "acme/widgets");
        assert_eq!(repo.as_str(), "acme/widgets");
    }
}
