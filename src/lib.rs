//! gitbridge - GitHub repository operations for a logged-in browser session
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - /login, /callback/handler (OAuth)                        │
//! │  - /github/* repository endpoints (session gated)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Session / Auth Layer                      │
//! │  - HMAC-signed cookie sessions                              │
//! │  - Auth gate and per-request GitHub client                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GitHub REST API                          │
//! │  - reqwest client bound to the session token                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for the repository endpoints and metrics
//! - `auth`: GitHub OAuth, sessions and the auth gate
//! - `github`: GitHub REST and OAuth calls
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod metrics;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

/// Application state shared across all handlers
///
/// Built once at startup and cloned into each request. Nothing in it is
/// mutated after construction.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Cookie session store
    pub sessions: auth::SessionStore,

    /// Pooled HTTP client for GitHub calls
    pub http_client: Arc<reqwest::Client>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let http_client = reqwest::Client::builder()
            .user_agent(config.github.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.github.timeout_seconds))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        let sessions = auth::SessionStore::new(&config.auth, config.server.secure_cookies);

        tracing::info!(
            api_url = %config.github.api_url,
            token_source = ?config.auth.token_source,
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            sessions,
            http_client: Arc::new(http_client),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .nest("/github", api::github_router(state.clone()))
        .layer(middleware::from_fn(track_requests))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(api::metrics_router())
}

/// Count requests per matched route and status
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics::HTTP_REQUESTS_TOTAL
        .with_label_values(&[endpoint.as_str(), response.status().as_str()])
        .inc();

    response
}

async fn health_check() -> &'static str {
    "OK"
}
