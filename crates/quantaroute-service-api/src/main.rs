//! QuantaRoute geocoder REST gateway binary.
//!
//! # Configuration
//!
//! - `QUANTAROUTE_API_KEY` - fallback credential when a request has no `x-api-key`
//! - `QUANTAROUTE_BASE_URL` - backend base URL (default: `https://api.quantaroute.com`)
//! - `QUANTAROUTE_TIMEOUT_SECS` - backend timeout in seconds (default: 30)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - set to `false` to disable the Prometheus recorder

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};

use quantaroute_lib::GatewayConfig;
use quantaroute_service_api::router;
use quantaroute_service_shared::{
    AppState, LoggingConfig, MetricsConfig, init_logging, init_metrics,
};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "continuing without metrics");
    }

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;
    if !config.has_api_key() {
        warn!("QUANTAROUTE_API_KEY not set; requests without an x-api-key header will be rejected");
    }

    let port = match env::var("SERVICE_PORT") {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("SERVICE_PORT must be a port number, got '{}'", raw))?,
        Err(_) => DEFAULT_PORT,
    };

    let state = AppState::from_config(config).context("failed to initialize gateway")?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, service = %logging_config.service, "listening on");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
