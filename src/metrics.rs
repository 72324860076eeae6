//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gitbridge_http_requests_total", "Total number of HTTP requests"),
        &["endpoint", "status"]
    ).expect("metric can be created");

    // Upstream (GitHub) Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gitbridge_upstream_requests_total", "Total number of GitHub API requests"),
        &["operation", "status"]
    ).expect("metric can be created");
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "gitbridge_upstream_request_duration_seconds",
            "GitHub API request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gitbridge_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Safe to call more than once; later calls leave the registry untouched.
pub fn init_metrics() {
    let collectors: [(&str, Box<dyn prometheus::core::Collector>); 4] = [
        ("HTTP_REQUESTS_TOTAL", Box::new(HTTP_REQUESTS_TOTAL.clone())),
        (
            "UPSTREAM_REQUESTS_TOTAL",
            Box::new(UPSTREAM_REQUESTS_TOTAL.clone()),
        ),
        (
            "UPSTREAM_REQUEST_DURATION_SECONDS",
            Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()),
        ),
        ("ERRORS_TOTAL", Box::new(ERRORS_TOTAL.clone())),
    ];

    for (name, collector) in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(error) => tracing::warn!(metric = name, %error, "Failed to register metric"),
        }
    }

    tracing::info!("Metrics registry initialized");
}
