//! Session management
//!
//! Uses HMAC-signed tokens stored in cookies.
//! No server-side session storage needed.

use std::collections::BTreeMap;

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Session key holding the GitHub access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// User session data
///
/// A string-keyed map stored in a signed cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    values: BTreeMap<String, String>,
    /// When session was created
    pub created_at: DateTime<Utc>,
    /// When session expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session valid for `max_age` seconds
    pub fn new(max_age: i64) -> Self {
        let now = Utc::now();
        Self {
            values: BTreeMap::new(),
            created_at: now,
            expires_at: now + Duration::seconds(max_age),
        }
    }

    /// Check if session is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Push the expiry out to `max_age` seconds from now
    pub fn renew(&mut self, max_age: i64) {
        self.expires_at = Utc::now() + Duration::seconds(max_age);
    }

    /// The stored GitHub access token, if the user has logged in
    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_KEY).filter(|token| !token.is_empty())
    }
}

/// Cookie-backed session store
///
/// Holds the signing key and cookie attributes; built once at startup
/// and shared through `AppState`.
#[derive(Clone)]
pub struct SessionStore {
    secret: String,
    cookie_name: String,
    max_age: i64,
    secure: bool,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(auth: &AuthConfig, secure: bool) -> Self {
        Self {
            secret: auth.session_key.clone(),
            cookie_name: auth.session_cookie.clone(),
            max_age: auth.session_max_age,
            secure,
        }
    }

    /// Load the default session, creating an empty one if needed
    pub fn get(&self, jar: &CookieJar) -> Result<Session, AppError> {
        self.get_named(jar, &self.cookie_name)
    }

    /// Load the session stored under cookie `name`
    ///
    /// A missing, tampered or expired cookie yields a fresh session.
    /// Only failures of the signing machinery itself are errors.
    pub fn get_named(&self, jar: &CookieJar, name: &str) -> Result<Session, AppError> {
        let Some(cookie) = jar.get(name) else {
            return Ok(Session::new(self.max_age));
        };

        match verify_session_token(cookie.value(), &self.secret) {
            Ok(session) => Ok(session),
            Err(AppError::Encryption(message)) => Err(AppError::Encryption(message)),
            Err(error) => {
                tracing::debug!(cookie = name, %error, "Discarding invalid session cookie");
                Ok(Session::new(self.max_age))
            }
        }
    }

    /// Restart the lifetime of `session` at the configured max age
    pub fn renew(&self, session: &mut Session) {
        session.renew(self.max_age);
    }

    /// Write `session` into the default session cookie
    pub fn save(&self, jar: CookieJar, session: &Session) -> Result<CookieJar, AppError> {
        self.save_named(jar, &self.cookie_name, session)
    }

    pub fn save_named(
        &self,
        jar: CookieJar,
        name: &str,
        session: &Session,
    ) -> Result<CookieJar, AppError> {
        let token = create_session_token(session, &self.secret)?;
        let cookie = Cookie::build((name.to_string(), token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build();
        Ok(jar.add(cookie))
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }
}

/// Create a signed session token
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
///
/// # Arguments
/// * `session` - Session data to encode
/// * `secret` - HMAC secret key
///
/// # Returns
/// Signed token string
pub fn create_session_token(session: &Session, secret: &str) -> Result<String, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Serialize session to JSON
    let payload = serde_json::to_string(session).map_err(|e| AppError::Internal(e.into()))?;

    // 2. Base64 encode the payload
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    // 3. Create HMAC-SHA256 signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Encryption(e.to_string()))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    // 4. Return "{payload}.{signature}"
    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode a session token
///
/// # Arguments
/// * `token` - Token string to verify
/// * `secret` - HMAC secret key
///
/// # Returns
/// Decoded session if valid
///
/// # Errors
/// Returns `Unauthorized` if the signature is invalid, the token is
/// malformed or the session has expired
pub fn verify_session_token(token: &str, secret: &str) -> Result<Session, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Split token into payload and signature
    let Some((payload_b64, signature_b64)) = token.split_once('.') else {
        return Err(AppError::Unauthorized);
    };

    // 2. Verify HMAC signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Encryption(e.to_string()))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::Unauthorized)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| AppError::Unauthorized)?;

    // 3. Decode and deserialize payload
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::Unauthorized)?;

    let session: Session =
        serde_json::from_slice(&payload_bytes).map_err(|_| AppError::Unauthorized)?;

    // 4. Check if session is expired
    if session.is_expired() {
        return Err(AppError::Unauthorized);
    }

    Ok(session)
}
