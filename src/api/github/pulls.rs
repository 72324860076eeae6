//! Pull request creation

use axum::response::Json;

use super::caller_login;
use crate::api::dto::CreatePullRequestRequest;
use crate::api::extract::JsonBody;
use crate::auth::SessionClient;
use crate::error::AppError;
use crate::github::PullRequest;

/// POST /github/createPullRequest
///
/// Any status GitHub rejects the pull request with is reported as 422.
pub async fn create_pull_request(
    SessionClient(github): SessionClient,
    JsonBody(params): JsonBody<CreatePullRequestRequest>,
) -> Result<Json<PullRequest>, AppError> {
    params.validate()?;

    let repo = params.repo_name.trim();
    let owner = caller_login(&github).await?;
    let pull = github
        .create_pull_request(&owner, repo, &params.to_new_pull_request())
        .await
        .map_err(|e| match e.status() {
            Some(_) => AppError::Unprocessable(e.message()),
            None => e.into(),
        })?;

    tracing::info!(repo = %repo, number = pull.number, "Pull request created");

    Ok(Json(pull))
}
