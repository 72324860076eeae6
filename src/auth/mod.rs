//! GitHub OAuth authentication
//!
//! Handles:
//! - GitHub OAuth flow
//! - Session management
//! - Authentication middleware

mod middleware;
mod oauth;
pub mod session;

pub use middleware::{LOGIN_PATH, SessionClient, redirect_found, require_session};
pub use oauth::auth_router;
pub use session::{
    ACCESS_TOKEN_KEY, Session, SessionStore, create_session_token, verify_session_token,
};
