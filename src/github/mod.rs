//! GitHub REST API access
//!
//! Handles:
//! - Token-bound API client (one per request)
//! - OAuth authorization-code exchange
//! - Upstream request/response types

mod client;
mod error;
pub mod oauth;
pub mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use types::*;
