//! gitbridge binary entry point

use gitbridge::{AppState, config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point
///
/// # Setup
/// 1. Load configuration from file and environment
/// 2. Initialize tracing/logging from `logging.*`
/// 3. Initialize AppState
/// 4. Build Axum router
/// 5. Start HTTP server
///
/// Missing credentials abort startup before the listener is bound.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration
    let loaded = config::AppConfig::load();

    // 2. Initialize tracing/logging
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    let config = match loaded {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "Refusing to start without valid configuration");
            return Err(error.into());
        }
    };

    tracing::info!("Starting gitbridge...");
    tracing::info!(
        bind = %config.server.bind_addr(),
        token_source = ?config.auth.token_source,
        log_level = %config.logging.level,
        "Configuration loaded"
    );
    if !config.server.secure_cookies {
        tracing::warn!("Using insecure session cookies; enable server.secure_cookies behind HTTPS");
    }

    gitbridge::metrics::init_metrics();

    // 3. Initialize application state
    let state = AppState::new(config.clone())?;

    // 4. Build Axum router
    let app = gitbridge::build_router(state);

    // 5. Start HTTP server
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides `logging.level`
fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    if logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
