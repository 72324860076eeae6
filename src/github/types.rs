//! GitHub API request and response shapes
//!
//! Response types keep every upstream field (`extra`) so handlers can
//! return GitHub's JSON unchanged while still reading the fields they need.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authenticated user (`GET /user`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub login: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Repository object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /user/repos`
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Object a git reference points at
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Git reference (`refs/heads/...`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: GitObject,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /repos/{owner}/{repo}/git/refs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

impl NewRef {
    /// Request creating `refs/heads/{branch}` at the commit `source` points to
    pub fn branch_from(branch: &str, source: &GitRef) -> Self {
        Self {
            ref_name: branch_ref(branch),
            sha: source.object.sha.clone(),
        }
    }
}

/// Fully qualified ref name for a branch
pub fn branch_ref(branch: &str) -> String {
    format!("refs/heads/{}", branch)
}

/// Body of `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
}

/// Pull request object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: Option<String>,
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize)]
pub struct NewFileContent {
    pub message: String,
    /// Base64 of the raw file bytes
    pub content: String,
    pub branch: String,
}

/// Result of a contents write: the new file and its commit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentWrite {
    pub content: Option<Value>,
    pub commit: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token endpoint response
///
/// GitHub reports exchange failures with a 200 status and an `error` field.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Error body GitHub returns alongside non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
}
