//! Branch creation

use axum::response::Json;
use http::StatusCode;

use super::caller_login;
use crate::api::dto::CreateBranchRequest;
use crate::api::extract::JsonBody;
use crate::auth::SessionClient;
use crate::error::AppError;
use crate::github::{GitRef, NewRef};

/// POST /github/createBranch
///
/// Looks up the source branch head and creates
/// `refs/heads/{destinationBranchName}` at the same commit.
pub async fn create_branch(
    SessionClient(github): SessionClient,
    JsonBody(params): JsonBody<CreateBranchRequest>,
) -> Result<Json<GitRef>, AppError> {
    params.validate()?;

    let repo = params.repo_name.trim();
    let owner = caller_login(&github).await?;
    let source_branch = params.source_branch();

    let source = github
        .get_branch_ref(&owner, repo, source_branch)
        .await
        .map_err(|e| match e.status() {
            Some(StatusCode::NOT_FOUND) => AppError::NotFound(format!(
                "Branch {} not found in {}",
                source_branch, repo
            )),
            _ => e.into(),
        })?;

    let new_ref = NewRef::branch_from(params.destination_branch_name.trim(), &source);
    let created = github
        .create_ref(&owner, repo, &new_ref)
        .await?;

    tracing::info!(
        repo = %repo,
        source = %source_branch,
        branch = %created.ref_name,
        "Branch created"
    );

    Ok(Json(created))
}
