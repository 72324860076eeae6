//! Error types for gitbridge
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::github::GitHubError;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Authentication required (401)
    #[error("Authentication required")]
    Unauthorized,

    /// OAuth exchange or CSRF check failed (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body over the configured limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Request body without a JSON content type (415)
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Conflicting state upstream (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422)
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    /// Upstream error with a status we pass through unchanged
    #[error("GitHub API error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session signing error (500)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    /// Malformed bodies are 400; size and content-type rejections keep their status.
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                AppError::UnsupportedMediaType(rejection.body_text())
            }
            _ => AppError::Validation(rejection.body_text()),
        }
    }
}

impl From<GitHubError> for AppError {
    /// Default mapping of upstream failures.
    ///
    /// Endpoints with stricter contracts remap before converting.
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Api { status, message } => match status {
                StatusCode::NOT_FOUND => AppError::NotFound(message),
                StatusCode::CONFLICT => AppError::Conflict(message),
                StatusCode::UNPROCESSABLE_ENTITY => AppError::Unprocessable(message),
                StatusCode::UNAUTHORIZED => AppError::Unauthorized,
                _ => AppError::Upstream { status, message },
            },
            GitHubError::Transport(e) => AppError::HttpClient(e),
            GitHubError::Decode(message) => AppError::Internal(anyhow::anyhow!(message)),
        }
    }
}

impl AppError {
    /// HTTP status, message and metric label for this error
    fn parts(&self) -> (StatusCode, String, &'static str) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), "not_found"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), "unauthorized"),
            AppError::AuthenticationFailed(_) => (
                StatusCode::UNAUTHORIZED,
                self.to_string(),
                "authentication_failed",
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "validation"),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                msg.clone(),
                "payload_too_large",
            ),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                msg.clone(),
                "unsupported_media_type",
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), "conflict"),
            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                "unprocessable",
            ),
            AppError::Upstream { status, message } => (*status, message.clone(), "upstream"),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string(), "http_client"),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "config"),
            AppError::Encryption(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session error".to_string(),
                "encryption",
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "internal",
            ),
        }
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message, error_type) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, error_type, "Request failed");
        } else {
            tracing::debug!(error = %self, error_type, status = status.as_u16(), "Request rejected");
        }

        // Record error metric
        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
