//! API layer
//!
//! HTTP handlers for:
//! - GitHub repository operations
//! - Metrics (Prometheus)

pub mod dto;
mod extract;
mod github;
pub mod metrics;

pub use dto::*;
pub use extract::JsonBody;

pub use github::github_router;
pub use metrics::metrics_router;
