//! GitHub commit status adapter.
//!
//! Implements [`notifier::StatusPublisher`] with a plain `reqwest` client
//! against the REST endpoint
//! `POST /repos/{owner}/{repo}/statuses/{sha}`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL construction, headers, authentication and body
//! encoding live here. The [`notifier`] crate sees only
//! [`notifier::StatusPublisher`].
//!
//! No timeout or retry is configured. Every HTTP response is handed back to the
//! caller as a [`PublishResponse`] whatever its status code.

use async_trait::async_trait;
use notifier::{
    AccessToken, CommitSha, PublishError, PublishResponse, RepositoryId, StatusPayload,
    StatusPublisher,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Request};
use tracing::debug;

/// Fixed `User-Agent` sent with every request.
pub const USER_AGENT_VALUE: &str = concat!("codepipeline-github-notifier/", env!("CARGO_PKG_VERSION"));

/// Client for the GitHub commit status API.
#[derive(Debug, Clone)]
pub struct GithubStatusClient {
    /// Base URL of the API (e.g. "https://api.github.com"), without trailing `/`.
    api_url: String,
    token: AccessToken,
    client: Client,
}

impl GithubStatusClient {
    pub fn new(api_url: impl Into<String>, token: AccessToken) -> Self {
        Self::with_client(api_url, token, Client::new())
    }

    /// Uses a caller-configured `reqwest` client.
    pub fn with_client(api_url: impl Into<String>, token: AccessToken, client: Client) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn statuses_url(&self, repository: &RepositoryId, commit: &CommitSha) -> String {
        format!("{}/repos/{}/statuses/{}", self.api_url, repository, commit)
    }

    /// Builds the status request without sending it.
    pub fn build_request(
        &self,
        repository: &RepositoryId,
        commit: &CommitSha,
        payload: &StatusPayload,
    ) -> Result<Request, PublishError> {
        let body = serde_json::to_vec(payload)?;

        self.client
            .request(Method::POST, self.statuses_url(repository, commit))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .body(body)
            .build()
            .map_err(transport)
    }
}

#[async_trait]
impl StatusPublisher for GithubStatusClient {
    async fn publish(
        &self,
        repository: &RepositoryId,
        commit: &CommitSha,
        payload: &StatusPayload,
    ) -> Result<PublishResponse, PublishError> {
        let request = self.build_request(repository, commit, payload)?;
        debug!(url = %request.url(), state = %payload.state, "sending commit status");

        let response = self.client.execute(request).await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        debug!(status, "GitHub responded");
        Ok(PublishResponse { status, body })
    }
}

fn transport(err: reqwest::Error) -> PublishError {
    PublishError::Transport {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifier::CommitState;

    fn client() -> GithubStatusClient {
        GithubStatusClient::new("https://api.github.com/", AccessToken::new("ghp_secret").unwrap())
    }

    fn payload() -> StatusPayload {
        StatusPayload {
            state: CommitState::Pending,
            context: "CodePipeline".into(),
            description: "web-deploy".into(),
            target_url: "https://us-east-1.console.aws.amazon.com/x".into(),
        }
    }

    fn repo_and_commit() -> (RepositoryId, CommitSha) {
        (
            RepositoryId::new("acme/widgets").unwrap(),
            CommitSha::new("0123abcd").unwrap(),
        )
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(client().api_url(), "https://api.github.com");
    }

    #[test]
    fn request_targets_statuses_endpoint() {
        let (repo, commit) = repo_and_commit();
        let request = client().build_request(&repo, &commit, &payload()).unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://api.github.com/repos/acme/widgets/statuses/0123abcd"
        );
    }

    #[test]
    fn request_carries_fixed_headers() {
        let (repo, commit) = repo_and_commit();
        let request = client().build_request(&repo, &commit, &payload()).unwrap();
        let headers = request.headers();

        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[USER_AGENT], USER_AGENT_VALUE);
        assert_eq!(headers[AUTHORIZATION], "Bearer ghp_secret");
    }

    #[test]
    fn request_body_is_json_payload() {
        let (repo, commit) = repo_and_commit();
        let request = client().build_request(&repo, &commit, &payload()).unwrap();

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(json["state"], "pending");
        assert_eq!(json["context"], "CodePipeline");
        assert_eq!(json["description"], "web-deploy");
        assert_eq!(json["target_url"], "https://us-east-1.console.aws.amazon.com/x");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = GithubStatusClient::new("http://127.0.0.1:9", AccessToken::new("t").unwrap());
        let (repo, commit) = repo_and_commit();

        let err = client.publish(&repo, &commit, &payload()).await.unwrap_err();
        assert!(matches!(err, PublishError::Transport { .. }));
    }
}
