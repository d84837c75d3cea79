//! Campus path broker HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /api/v1/route` - Compute a walking path between two locations
//! - `GET /api/v1/locations` - List the known locations
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `PATHFINDER_*`, `MAP_LINK_BASE_URL`, `GAZETTEER_PATH` - broker settings
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - Set to "false" to disable `/metrics` recording

use std::env;
use std::net::SocketAddr;

use tracing::{error, info, warn};

use pathbroker_lib::BrokerConfig;
use pathbroker_service::{
    init_logging, init_metrics, router, AppState, LoggingConfig, MetricsConfig, SERVICE_NAME,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service(SERVICE_NAME));

    if let Err(e) = init_metrics(&MetricsConfig::from_env()) {
        warn!(error = %e, "continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = BrokerConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid broker configuration");
        e
    })?;

    info!(
        executable = %config.executable.display(),
        timeout_secs = config.timeout.as_secs(),
        max_concurrent = config.max_concurrent,
        port,
        "starting path broker service"
    );

    let state = AppState::from_config(&config).map_err(|e| {
        error!(error = %e, "failed to initialize path broker");
        e
    })?;

    info!(
        locations = state.broker().gazetteer().len(),
        "path broker ready"
    );

    let app = router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C, after closing broker admission.
async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested; refusing new computations");
    state.broker().orchestrator().close();
}
