//! Authentication middleware
//!
//! Protects routes that require a GitHub access token in the session.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{Request, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::error::AppError;
use crate::github::GitHubClient;

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Middleware to require a logged-in session
///
/// Redirects (302) to `/login` when the session carries no access
/// token; the wrapped handler is not invoked in that case.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/listRepo", ...)
///     .route_layer(middleware::from_fn_with_state(state, require_session));
/// ```
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = state.sessions.get(&jar)?;

    if session.access_token().is_none() {
        tracing::debug!(path = %request.uri().path(), "No access token in session, redirecting to login");
        return Ok(redirect_found(LOGIN_PATH));
    }

    Ok(next.run(request).await)
}

/// 302 Found to `location`
///
/// `axum::response::Redirect` only offers 303/307/308.
pub fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Extractor for a GitHub client bound to the session's access token
///
/// # Usage
/// ```ignore
/// async fn handler(
///     SessionClient(github): SessionClient,
/// ) -> Result<Json<Vec<Repository>>, AppError> {
///     Ok(Json(github.list_repositories().await?))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionClient(pub GitHubClient);

#[async_trait]
impl<S> FromRequestParts<S> for SessionClient
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Build a client from the session cookie
    ///
    /// A session without a token is `Unauthorized`, never a panic.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let session = state.sessions.get(&jar)?;
        let token = session.access_token().ok_or(AppError::Unauthorized)?;

        Ok(SessionClient(GitHubClient::new(
            state.http_client.as_ref().clone(),
            &state.config.github.api_url,
            token,
        )))
    }
}
