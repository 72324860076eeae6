//! Token-bound GitHub REST client

use std::time::Instant;

use base64::{Engine as _, engine::general_purpose};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::GitHubError;
use super::types::{
    ApiErrorBody, ContentWrite, GitRef, NewFileContent, NewPullRequest, NewRef, NewRepository,
    PullRequest, Repository, User,
};
use crate::metrics::{UPSTREAM_REQUEST_DURATION_SECONDS, UPSTREAM_REQUESTS_TOTAL};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client authenticated with a single bearer token
///
/// Cheap to build: it borrows the shared connection pool of the
/// `reqwest::Client` it is given.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, api_url: &str, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// GET /user
    pub async fn current_user(&self) -> Result<User, GitHubError> {
        self.send("get_user", self.request(Method::GET, "/user")).await
    }

    /// GET /user/repos
    pub async fn list_repositories(&self) -> Result<Vec<Repository>, GitHubError> {
        self.send("list_repos", self.request(Method::GET, "/user/repos"))
            .await
    }

    /// POST /user/repos
    pub async fn create_repository(&self, repo: &NewRepository) -> Result<Repository, GitHubError> {
        self.send(
            "create_repo",
            self.request(Method::POST, "/user/repos").json(repo),
        )
        .await
    }

    /// GET /repos/{owner}/{repo}
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, GitHubError> {
        let path = repo_path(owner, repo, "");
        self.send("get_repo", self.request(Method::GET, &path)).await
    }

    /// GET /repos/{owner}/{repo}/git/ref/heads/{branch}
    pub async fn get_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<GitRef, GitHubError> {
        let path = repo_path(owner, repo, &format!("/git/ref/heads/{}", encode_path(branch)));
        self.send("get_ref", self.request(Method::GET, &path)).await
    }

    /// POST /repos/{owner}/{repo}/git/refs
    pub async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        new_ref: &NewRef,
    ) -> Result<GitRef, GitHubError> {
        let path = repo_path(owner, repo, "/git/refs");
        self.send(
            "create_ref",
            self.request(Method::POST, &path).json(new_ref),
        )
        .await
    }

    /// POST /repos/{owner}/{repo}/pulls
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pull: &NewPullRequest,
    ) -> Result<PullRequest, GitHubError> {
        let path = repo_path(owner, repo, "/pulls");
        self.send(
            "create_pull_request",
            self.request(Method::POST, &path).json(pull),
        )
        .await
    }

    /// PUT /repos/{owner}/{repo}/contents/{path}
    ///
    /// `content` is sent as-is after base64 encoding, which the
    /// contents API requires.
    pub async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        file_path: &str,
        message: &str,
        content: &[u8],
        branch: &str,
    ) -> Result<ContentWrite, GitHubError> {
        let body = NewFileContent {
            message: message.to_string(),
            content: general_purpose::STANDARD.encode(content),
            branch: branch.to_string(),
        };
        let path = repo_path(owner, repo, &format!("/contents/{}", encode_path(file_path)));
        self.send(
            "create_content",
            self.request(Method::PUT, &path).json(&body),
        )
        .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GitHubError> {
        let started = Instant::now();
        let result = request.send().await;
        UPSTREAM_REQUEST_DURATION_SECONDS
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                UPSTREAM_REQUESTS_TOTAL
                    .with_label_values(&[operation, "error"])
                    .inc();
                tracing::warn!(operation, %error, "GitHub request failed");
                return Err(error.into());
            }
        };

        let status = response.status();
        UPSTREAM_REQUESTS_TOTAL
            .with_label_values(&[operation, status.as_str()])
            .inc();
        tracing::debug!(operation, status = status.as_u16(), "GitHub responded");

        decode(response).await
    }
}

/// Turn a GitHub response into `T` or a `GitHubError::Api`
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GitHubError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
        return Err(GitHubError::Api { status, message });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GitHubError::Decode(e.to_string()))
}

/// Percent-encode each segment of a slash-separated path
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn repo_path(owner: &str, repo: &str, suffix: &str) -> String {
    format!(
        "/repos/{}/{}{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_path_keeps_directories() {
        assert_eq!(encode_path("docs/read me.md"), "docs/read%20me.md");
        assert_eq!(encode_path("/notes.txt"), "notes.txt");
    }

    #[test]
    fn repo_path_escapes_names() {
        assert_eq!(repo_path("octocat", "demo", "/pulls"), "/repos/octocat/demo/pulls");
        assert_eq!(repo_path("octo cat", "a/b", ""), "/repos/octo%20cat/a%2Fb");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GitHubClient::new(reqwest::Client::new(), "http://127.0.0.1:9/", "t");
        assert_eq!(client.api_url, "http://127.0.0.1:9");
    }
}
