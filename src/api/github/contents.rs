//! File content creation

use axum::response::Json;
use http::StatusCode;

use super::caller_login;
use crate::api::dto::CreateContentRequest;
use crate::api::extract::JsonBody;
use crate::auth::SessionClient;
use crate::error::AppError;
use crate::github::ContentWrite;

/// POST /github/createContent
///
/// Commits `fileContent` to `path` (or `fileName`) on `branchName`.
pub async fn create_content(
    SessionClient(github): SessionClient,
    JsonBody(params): JsonBody<CreateContentRequest>,
) -> Result<Json<ContentWrite>, AppError> {
    params.validate()?;

    let repo = params.repo_name.trim();
    let owner = caller_login(&github).await?;
    let path = params.effective_path();

    let written = github
        .create_file(
            &owner,
            repo,
            path,
            &params.message,
            params.file_content.as_bytes(),
            &params.branch_name,
        )
        .await
        .map_err(|e| match e.status() {
            Some(StatusCode::NOT_FOUND) => AppError::NotFound(e.message()),
            Some(StatusCode::CONFLICT) => AppError::Conflict(e.message()),
            Some(_) => AppError::Unprocessable(e.message()),
            None => e.into(),
        })?;

    tracing::info!(
        repo = %repo,
        branch = %params.branch_name,
        path = %path,
        bytes = params.file_content.len(),
        "File content created"
    );

    Ok(Json(written))
}
