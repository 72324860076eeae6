//! Upstream failure type

use http::StatusCode;
use thiserror::Error;

/// Failure talking to GitHub
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with a non-success status
    #[error("GitHub API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// The request never produced a response
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Unexpected GitHub response: {0}")]
    Decode(String),
}

impl GitHubError {
    /// Upstream status, if GitHub answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            GitHubError::Transport(e) => e.status(),
            GitHubError::Decode(_) => None,
        }
    }

    /// Human-readable message without the status prefix
    pub fn message(&self) -> String {
        match self {
            GitHubError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
