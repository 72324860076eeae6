//! Request and response bodies of the `/github` endpoints

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::github::{NewPullRequest, NewRepository, Repository};

/// Branch used when a create-branch request names no source
pub const DEFAULT_SOURCE_BRANCH: &str = "main";

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Entry of the repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryListItem {
    pub name: String,
    pub full_name: String,
    pub description: String,
}

impl From<&Repository> for RepositoryListItem {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            description: repo.description.clone().unwrap_or_default(),
        }
    }
}

/// POST /github/createRepo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepoRequest {
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateRepoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.repo_name, "repoName")
    }

    pub fn to_new_repository(&self) -> NewRepository {
        NewRepository {
            name: self.repo_name.trim().to_string(),
            private: self.private,
            description: self
                .description
                .clone()
                .filter(|description| !description.is_empty()),
        }
    }
}

/// GET /github/getRepo query string
#[derive(Debug, Clone, Deserialize)]
pub struct GetRepoQuery {
    pub name: Option<String>,
}

impl GetRepoQuery {
    pub fn repo_name(&self) -> Result<&str, AppError> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Validation("name query parameter is required".to_string()))
    }
}

/// POST /github/createBranch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub source_branch_name: String,
    #[serde(default)]
    pub destination_branch_name: String,
    /// Accepted for compatibility; branches inherit repository visibility
    #[serde(default)]
    pub private: bool,
}

impl CreateBranchRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.repo_name, "repoName")?;
        require(&self.destination_branch_name, "destinationBranchName")
    }

    /// Source branch, `main` when omitted
    pub fn source_branch(&self) -> &str {
        match self.source_branch_name.trim() {
            "" => DEFAULT_SOURCE_BRANCH,
            name => name,
        }
    }
}

/// POST /github/createPullRequest
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub pr_subject: String,
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub base: String,
}

impl CreatePullRequestRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.repo_name, "repoName")?;
        require(&self.pr_subject, "prSubject")?;
        require(&self.head, "head")?;
        require(&self.base, "base")
    }

    pub fn to_new_pull_request(&self) -> NewPullRequest {
        NewPullRequest {
            title: self.pr_subject.clone(),
            head: self.head.clone(),
            base: self.base.clone(),
        }
    }
}

/// POST /github/createContent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub branch_name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_content: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub message: String,
}

impl CreateContentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.repo_name, "repoName")?;
        require(&self.branch_name, "branchName")?;
        require(&self.file_name, "fileName")?;
        if self.file_content.is_empty() {
            return Err(AppError::Validation("fileContent is required".to_string()));
        }
        require(&self.message, "message")
    }

    /// Target path, `fileName` when `path` is empty
    pub fn effective_path(&self) -> &str {
        match self.path.trim() {
            "" => self.file_name.trim(),
            path => path,
        }
    }
}
