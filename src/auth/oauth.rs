//! GitHub OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with GitHub.

use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;

use super::middleware::redirect_found;
use super::session::ACCESS_TOKEN_KEY;
use crate::AppState;
use crate::config::TokenSource;
use crate::error::AppError;
use crate::github::oauth::{authorize_url, exchange_code};

const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_PATH: &str = "/callback";
/// Landing page after a successful login
const AFTER_LOGIN_PATH: &str = "/github/listRepo";

/// Create authentication router
///
/// Routes:
/// - GET /login - Redirect to GitHub
/// - GET /callback/handler - OAuth callback
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(github_login))
        .route("/callback/handler", get(github_callback))
}

// =============================================================================
// GitHub OAuth
// =============================================================================

/// GET /login
///
/// Redirects user to GitHub authorization page.
///
/// # Steps
/// 1. Generate CSRF state token
/// 2. Store state in cookie
/// 3. Redirect to GitHub with client_id, scope, state
async fn github_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let csrf_state = generate_csrf_state();
    let location = authorize_url(&state.config.github, &csrf_state)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf_state))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .secure(state.sessions.is_secure())
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(scope = %state.config.github.scope, "Redirecting to GitHub authorization");

    Ok((jar.add(cookie), redirect_found(&location)))
}

/// Query parameters from GitHub callback
#[derive(Debug, Deserialize)]
struct GitHubCallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// CSRF state token
    state: Option<String>,
}

/// GET /callback/handler
///
/// Handles OAuth callback from GitHub.
///
/// # Steps
/// 1. Verify CSRF state
/// 2. Exchange code for access token
/// 3. Store token in the session and save it
/// 4. Redirect to the repository listing
async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<GitHubCallbackQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let access_token = match state.config.auth.token_source {
        TokenSource::Oauth => {
            verify_csrf_state(query.state.as_deref(), &jar)?;

            let code = query
                .code
                .as_deref()
                .filter(|code| !code.is_empty())
                .ok_or_else(|| AppError::Validation("code is required".to_string()))?;

            exchange_code(&state.http_client, &state.config.github, code)
                .await
                .map_err(|e| AppError::AuthenticationFailed(e.message()))?
        }
        TokenSource::Static => state
            .config
            .github
            .access_token
            .clone()
            .ok_or_else(|| AppError::Config("GITHUB_ACCESS_TOKEN is not defined".to_string()))?,
    };

    let mut session = state.sessions.get(&jar)?;
    session.insert(ACCESS_TOKEN_KEY, access_token);
    state.sessions.renew(&mut session);
    let jar = state.sessions.save(jar, &session)?;
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path(OAUTH_STATE_PATH));

    tracing::info!("Login completed, session saved");

    Ok((jar, Redirect::temporary(AFTER_LOGIN_PATH)))
}

// =============================================================================
// Helpers
// =============================================================================

/// Generate a random CSRF state token
fn generate_csrf_state() -> String {
    let mut bytes = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Verify CSRF state from cookie matches callback state
fn verify_csrf_state(state: Option<&str>, jar: &CookieJar) -> Result<(), AppError> {
    let expected = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or_else(|| AppError::AuthenticationFailed("missing OAuth state cookie".to_string()))?;

    match state {
        Some(state) if !state.is_empty() && state == expected => Ok(()),
        _ => Err(AppError::AuthenticationFailed(
            "OAuth state mismatch".to_string(),
        )),
    }
}
