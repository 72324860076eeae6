//! Repository endpoints

use axum::{extract::Query, response::Json};
use http::StatusCode;

use super::caller_login;
use crate::api::dto::{CreateRepoRequest, GetRepoQuery, RepositoryListItem};
use crate::api::extract::JsonBody;
use crate::auth::SessionClient;
use crate::error::AppError;
use crate::github::Repository;

/// GET /github/listRepo
///
/// Repositories of the caller, projected to name/fullName/description
/// in upstream order.
pub async fn list_repos(
    SessionClient(github): SessionClient,
) -> Result<Json<Vec<RepositoryListItem>>, AppError> {
    let repos = github.list_repositories().await?;
    tracing::debug!(count = repos.len(), "Listed repositories");

    Ok(Json(repos.iter().map(RepositoryListItem::from).collect()))
}

/// POST /github/createRepo
pub async fn create_repo(
    SessionClient(github): SessionClient,
    JsonBody(params): JsonBody<CreateRepoRequest>,
) -> Result<Json<Repository>, AppError> {
    params.validate()?;

    let repo = github
        .create_repository(&params.to_new_repository())
        .await?;
    tracing::info!(repo = %repo.full_name, private = repo.private, "Repository created");

    Ok(Json(repo))
}

/// GET /github/getRepo?name=
pub async fn get_repo(
    SessionClient(github): SessionClient,
    Query(query): Query<GetRepoQuery>,
) -> Result<Json<Repository>, AppError> {
    let name = query.repo_name()?;
    let owner = caller_login(&github).await?;

    let repo = github
        .get_repository(&owner, name)
        .await
        .map_err(|e| match e.status() {
            Some(StatusCode::NOT_FOUND) => AppError::NotFound("Repo not found".to_string()),
            _ => e.into(),
        })?;

    Ok(Json(repo))
}
