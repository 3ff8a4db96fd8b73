//! Process-wide configuration.
//!
//! Read once at startup and passed into the handler explicitly. Tests build a
//! [`NotifierConfig`] through [`NotifierConfig::from_lookup`] without touching
//! the process environment.

use crate::{AwsRegion, NotifierError};

/// Environment variable holding the GitHub access token.
pub const ACCESS_TOKEN_VAR: &str = "GITHUB_ACCESS_TOKEN";
/// Environment variable holding the AWS region (set by the Lambda runtime).
pub const REGION_VAR: &str = "AWS_REGION";
/// Optional override of the GitHub API base URL (GitHub Enterprise).
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Credential for the GitHub API. The value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns `None` for an empty token.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() { None } else { Some(Self(v)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub access_token: AccessToken,
    pub region: AwsRegion,
    /// Base URL of the GitHub REST API, without trailing `/`.
    pub github_api_url: String,
}

impl NotifierConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_VAR)
            .and_then(AccessToken::new)
            .ok_or_else(|| missing(ACCESS_TOKEN_VAR))?;
        let region = lookup(REGION_VAR)
            .and_then(AwsRegion::new)
            .ok_or_else(|| missing(REGION_VAR))?;
        let github_api_url = lookup(GITHUB_API_URL_VAR)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            access_token,
            region,
            github_api_url,
        })
    }
}

fn missing(var: &str) -> NotifierError {
    NotifierError::Configuration {
        message: format!("environment variable {var} must be set and non-empty"),
    }
}
