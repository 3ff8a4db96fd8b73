//! Repository identification from artifact revision URLs.
//!
//! Two URL shapes exist:
//!
//! - **Connection** URLs (CodeStar source connections) carry the repository as a
//!   `FullRepositoryId=owner/repo` query parameter.
//! - **Legacy** URLs (GitHub version 1 source action) are plain GitHub commit
//!   links, `https://github.com/owner/repo/commit/<sha>`.
//!
//! The legacy strategy reads fixed path positions and does not check that the
//! URL actually points at GitHub. A differently-shaped URL yields a wrong
//! repository rather than an error.

use crate::{NotifierError, RepositoryId};

/// Query parameter marking a connection URL.
pub const FULL_REPOSITORY_ID_PARAM: &str = "FullRepositoryId=";

/// A revision URL, tagged by the strategy used to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionUrl<'a> {
    Connection(&'a str),
    Legacy(&'a str),
}

impl<'a> RevisionUrl<'a> {
    pub fn detect(url: &'a str) -> Self {
        if url.contains(FULL_REPOSITORY_ID_PARAM) {
            Self::Connection(url)
        } else {
            Self::Legacy(url)
        }
    }

    pub fn repository_id(self) -> Result<RepositoryId, NotifierError> {
        match self {
            Self::Connection(url) => repository_from_connection_url(url),
            Self::Legacy(url) => repository_from_legacy_url(url),
        }
    }
}

/// Reads the `FullRepositoryId` query value, up to the next `&`.
pub fn repository_from_connection_url(url: &str) -> Result<RepositoryId, NotifierError> {
    let value = url
        .split_once(FULL_REPOSITORY_ID_PARAM)
        .map(|(_, rest)| rest.split('&').next().unwrap_or_default())
        .unwrap_or_default();

    RepositoryId::new(value).ok_or_else(|| NotifierError::MalformedRevisionUrl {
        url: url.to_string(),
    })
}

/// Joins `/`-delimited segments 3 and 4 (`scheme:`, ``, host, owner, repo).
pub fn repository_from_legacy_url(url: &str) -> Result<RepositoryId, NotifierError> {
    let mut segments = url.split('/').skip(3);
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => RepositoryId::new(format!("{owner}/{repo}")).ok_or_else(|| {
            NotifierError::MalformedRevisionUrl {
                url: url.to_string(),
            }
        }),
        _ => Err(NotifierError::MalformedRevisionUrl {
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_url_reads_query_parameter() {
        let url = "https://console.aws.amazon.com/codesuite/settings/connections/redirect\
                   ?connectionArn=arn:aws:codestar-connections:us-east-1:1:connection/x\
                   &FullRepositoryId=acme/widgets&Commit=abc123";
        let detected = RevisionUrl::detect(url);
        assert!(matches!(detected, RevisionUrl::Connection(_)));
        assert_eq!(detected.repository_id().unwrap().as_str(), "acme/widgets");
    }

    #[test]
    fn connection_parameter_may_end_the_url() {
        let repo = repository_from_connection_url("https://x/foo?FullRepositoryId=acme/widgets").unwrap();
        assert_eq!(repo.as_str(), "acme/widgets");
    }

    #[test]
    fn connection_parameter_followed_by_other_params() {
        let repo =
            repository_from_connection_url(".../foo?FullRepositoryId=acme/widgets&other=1").unwrap();
        assert_eq!(repo.as_str(), "acme/widgets");
    }

    #[test]
    fn empty_connection_parameter_is_malformed() {
        let err = repository_from_connection_url("https://x/?FullRepositoryId=&Commit=1").unwrap_err();
        assert!(matches!(err, NotifierError::MalformedRevisionUrl { .. }));
    }

    #[test]
    fn legacy_url_reads_owner_and_repo_segments() {
        let url = "https://github.com/acme/widgets/commit/0123abcd";
        assert!(matches!(RevisionUrl::detect(url), RevisionUrl::Legacy(_)));
        assert_eq!(RevisionUrl::detect(url).repository_id().unwrap().as_str(), "acme/widgets");
    }

    #[test]
    fn legacy_url_uses_fixed_positions() {
        // Segments: [a, b, c, acme, widgets, e] after splitting on '/'.
        let repo = repository_from_legacy_url("a/b/c/acme/widgets/e").unwrap();
        assert_eq!(repo.as_str(), "acme/widgets");
    }

    #[test]
    fn legacy_url_with_other_host_is_not_validated() {
        let repo = repository_from_legacy_url("https://example.com/x/y/z").unwrap();
        assert_eq!(repo.as_str(), "x/y");
    }

    #[test]
    fn short_legacy_url_is_malformed() {
        let err = repository_from_legacy_url("https://github.com/acme").unwrap_err();
        assert!(matches!(err, NotifierError::MalformedRevisionUrl { .. }));
    }
}
