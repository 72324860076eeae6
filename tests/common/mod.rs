//! Common test utilities for E2E tests

#![allow(dead_code)]

pub mod fake_github;

use gitbridge::{AppState, config};
use tokio::net::TcpListener;

pub use fake_github::{FakeGitHub, RecordedCall};

/// Token the fake GitHub hands out for the code `good-code`
pub const EXCHANGED_TOKEN: &str = "gho_exchanged";
/// Token placed in sessions created by `TestServer::session_cookie`
pub const SESSION_TOKEN: &str = "gho_session";
pub const SESSION_KEY: &str = "test-session-key-32-bytes-long!!";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub github: FakeGitHub,
    /// Client that does not follow redirects
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server after adjusting the default test configuration
    pub async fn with_config(adjust: impl FnOnce(&mut config::AppConfig)) -> Self {
        let github = FakeGitHub::start().await;

        // Create test configuration
        let mut config = config::AppConfig {
            server: config::ServerConfig {
                host: Some("127.0.0.1".to_string()),
                port: 0, // Let OS assign port
                secure_cookies: false,
                max_body_bytes: 1024 * 1024,
            },
            auth: config::AuthConfig {
                session_key: SESSION_KEY.to_string(),
                session_cookie: "session".to_string(),
                session_max_age: 3600,
                token_source: config::TokenSource::Oauth,
            },
            github: config::GitHubConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                access_token: None,
                scope: "repo".to_string(),
                api_url: github.url(),
                oauth_url: github.url(),
                user_agent: "gitbridge-tests".to_string(),
                timeout_seconds: 10,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };
        adjust(&mut config);

        // Initialize app state
        let state = AppState::new(config).unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = gitbridge::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            github,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// `Cookie` header value for a logged-in session
    pub fn session_cookie(&self) -> String {
        self.session_cookie_expiring_in(3600)
    }

    /// Logged-in session cookie with `seconds` left before it expires
    pub fn session_cookie_expiring_in(&self, seconds: i64) -> String {
        use gitbridge::auth::{ACCESS_TOKEN_KEY, Session, create_session_token};

        let mut session = Session::new(seconds);
        session.insert(ACCESS_TOKEN_KEY, SESSION_TOKEN);
        let token = create_session_token(&session, SESSION_KEY).expect("Failed to sign session");
        format!("session={}", token)
    }

    pub async fn get_authed(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("Cookie", self.session_cookie())
            .send()
            .await
            .expect("request succeeds")
    }

    pub async fn post_authed(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Cookie", self.session_cookie())
            .json(&body)
            .send()
            .await
            .expect("request succeeds")
    }
}

/// `name=value` of the first Set-Cookie header for `name`
pub fn set_cookie_pair(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(ToString::to_string)
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}
