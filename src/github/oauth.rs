//! GitHub OAuth endpoints (authorize redirect and code exchange)

use serde::Serialize;
use url::Url;

use super::client::decode;
use super::error::GitHubError;
use super::types::AccessTokenResponse;
use crate::config::GitHubConfig;

/// Build the GitHub authorize URL the login handler redirects to
pub fn authorize_url(config: &GitHubConfig, state: &str) -> Result<String, GitHubError> {
    let base = format!(
        "{}/login/oauth/authorize",
        config.oauth_url.trim_end_matches('/')
    );
    let url = Url::parse_with_params(
        &base,
        &[
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| GitHubError::Decode(format!("invalid OAuth URL: {e}")))?;

    Ok(url.to_string())
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Exchange an authorization code for an access token
///
/// # Errors
/// `GitHubError::Api` with status 401 when GitHub rejects the code
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &GitHubConfig,
    code: &str,
) -> Result<String, GitHubError> {
    let url = format!(
        "{}/login/oauth/access_token",
        config.oauth_url.trim_end_matches('/')
    );

    let response = http
        .post(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(&TokenRequest {
            client_id: &config.client_id,
            client_secret: &config.client_secret,
            code,
        })
        .send()
        .await?;

    let token: AccessTokenResponse = decode(response).await?;

    if let Some(access_token) = token.access_token.filter(|t| !t.is_empty()) {
        tracing::info!(
            token_type = token.token_type.as_deref().unwrap_or("unknown"),
            scope = token.scope.as_deref().unwrap_or(""),
            "OAuth code exchanged"
        );
        return Ok(access_token);
    }

    Err(GitHubError::Api {
        status: http::StatusCode::UNAUTHORIZED,
        message: token
            .error_description
            .or(token.error)
            .unwrap_or_else(|| "token endpoint returned no access token".to_string()),
    })
}
