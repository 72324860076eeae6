//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (GITBRIDGE__*)
//! 4. Plain deployment variables (SESSION_KEY, GITHUB_*, HOST, PORT)

use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub github: GitHubConfig,
    pub logging: LoggingConfig,
}

/// Interface the listener binds when `HOST` is not set
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listener host; all interfaces when unset
    #[serde(default)]
    pub host: Option<String>,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Mark session cookies `Secure` (enable behind HTTPS)
    #[serde(default)]
    pub secure_cookies: bool,
    /// Upper bound for request bodies in bytes
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Listener address in `host:port` form
    pub fn bind_addr(&self) -> String {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or(DEFAULT_BIND_HOST);
        format!("{}:{}", host, self.port)
    }
}

/// Where the callback handler obtains the access token it stores
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    /// Exchange the authorization code at the GitHub token endpoint
    #[default]
    Oauth,
    /// Store `github.access_token` as-is (local development)
    Static,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Cookie signing key (32+ bytes)
    pub session_key: String,
    /// Name of the session cookie
    pub session_cookie: String,
    /// Session max age in seconds (default: 604800 = 7 days)
    pub session_max_age: i64,
    #[serde(default)]
    pub token_source: TokenSource,
}

/// GitHub OAuth application and API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Static token, only consulted when `auth.token_source = "static"`
    pub access_token: Option<String>,
    /// OAuth scope requested at login
    pub scope: String,
    /// REST API base URL
    pub api_url: String,
    /// OAuth host serving /login/oauth/*
    pub oauth_url: String,
    pub user_agent: String,
    /// Timeout for each upstream call
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> String {
        format!("gitbridge={},tower_http=debug", self.level.trim())
    }

    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

/// Read a credential from the process environment.
///
/// Absent and empty values are both configuration errors.
pub fn credential(name: &str) -> Result<String, crate::error::AppError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(crate::error::AppError::Config(format!("{name} is empty"))),
        Err(_) => Err(crate::error::AppError::Config(format!("{name} is not defined"))),
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (GITBRIDGE__*)
    /// 5. SESSION_KEY, GITHUB_CLIENT_ID, GITHUB_CLIENT_SECRET,
    ///    GITHUB_ACCESS_TOKEN, HOST, PORT
    ///
    /// # Errors
    /// Returns error if configuration is invalid or a required
    /// credential is missing
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let port = match credential("PORT") {
            Ok(raw) => Some(raw.trim().parse::<i64>().map_err(|e| {
                crate::error::AppError::Config(format!("PORT must be a number: {e}"))
            })?),
            Err(_) => None,
        };

        let config = Config::builder()
            // Start with default values
            .set_default("server.port", 8080)?
            .set_default("server.secure_cookies", false)?
            .set_default("server.max_body_bytes", 1024 * 1024)?
            .set_default("auth.session_cookie", "session")?
            .set_default("auth.session_max_age", 604800)?
            .set_default("auth.token_source", "oauth")?
            .set_default("github.scope", "repo")?
            .set_default("github.api_url", "https://api.github.com")?
            .set_default("github.oauth_url", "https://github.com")?
            .set_default("github.user_agent", "gitbridge/0.1.0")?
            .set_default("github.timeout_seconds", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (GITBRIDGE__*)
            .add_source(
                Environment::with_prefix("GITBRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            // Deployment variables take precedence over everything else
            .set_override_option("server.host", credential("HOST").ok())?
            .set_override_option("server.port", port)?
            .set_override_option("auth.session_key", credential("SESSION_KEY").ok())?
            .set_override_option("github.client_id", credential("GITHUB_CLIENT_ID").ok())?
            .set_override_option(
                "github.client_secret",
                credential("GITHUB_CLIENT_SECRET").ok(),
            )?
            .set_override_option(
                "github.access_token",
                credential("GITHUB_ACCESS_TOKEN").ok(),
            )?
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        const MIN_SESSION_KEY_BYTES: usize = 32;

        if self.auth.session_key.as_bytes().len() < MIN_SESSION_KEY_BYTES {
            return Err(crate::error::AppError::Config(format!(
                "SESSION_KEY must be at least {} bytes",
                MIN_SESSION_KEY_BYTES
            )));
        }

        if self.auth.session_max_age <= 0 {
            return Err(crate::error::AppError::Config(
                "auth.session_max_age must be greater than 0".to_string(),
            ));
        }

        if self.github.client_id.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "GITHUB_CLIENT_ID is not defined".to_string(),
            ));
        }

        if self.github.client_secret.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "GITHUB_CLIENT_SECRET is not defined".to_string(),
            ));
        }

        let has_static_token = self
            .github
            .access_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());
        if self.auth.token_source == TokenSource::Static && !has_static_token {
            return Err(crate::error::AppError::Config(
                "GITHUB_ACCESS_TOKEN is required when auth.token_source=static".to_string(),
            ));
        }

        for (key, value) in [
            ("github.api_url", &self.github.api_url),
            ("github.oauth_url", &self.github.oauth_url),
        ] {
            url::Url::parse(value).map_err(|e| {
                crate::error::AppError::Config(format!("{key} is not a valid URL: {e}"))
            })?;
        }

        Ok(())
    }
}
