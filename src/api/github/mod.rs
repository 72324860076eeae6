//! Repository operation endpoints
//!
//! Every route is gated by the session middleware and forwards to the
//! GitHub REST API with the session's access token.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::AppState;
use crate::auth::require_session;
use crate::error::AppError;
use crate::github::GitHubClient;

pub mod branches;
pub mod contents;
pub mod pulls;
pub mod repos;

/// Create the `/github` router
///
/// Routes:
/// - GET /listRepo
/// - POST /createRepo
/// - GET /getRepo?name=
/// - POST /createBranch
/// - POST /createPullRequest
/// - POST /createContent
pub fn github_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/listRepo", get(repos::list_repos))
        .route("/createRepo", post(repos::create_repo))
        .route("/getRepo", get(repos::get_repo))
        .route("/createBranch", post(branches::create_branch))
        .route("/createPullRequest", post(pulls::create_pull_request))
        .route("/createContent", post(contents::create_content))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

/// Login of the user the token belongs to; owner of every repo we touch
pub(crate) async fn caller_login(github: &GitHubClient) -> Result<String, AppError> {
    Ok(github.current_user().await?.login)
}
