//! Prometheus metrics for the gateway HTTP service.
//!
//! - [`init_metrics`] installs the global recorder once at startup
//! - [`metrics_handler`] renders the `/metrics` endpoint
//! - [`record_operation`] / [`record_operation_failed`] count dispatched operations

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// `METRICS_ENABLED`: anything other than `false` keeps metrics on.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        Self { enabled }
    }
}

#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the Prometheus recorder. Must be called at most once per process.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Axum handler for `/metrics` (Prometheus text exposition format).
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Count one successfully dispatched operation.
///
/// Increments `quantaroute_operations_total{operation}`.
pub fn record_operation(operation: &str) {
    metrics::counter!(
        "quantaroute_operations_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Count one failed operation.
///
/// Increments `quantaroute_operation_failures_total{operation, reason}`, where
/// `reason` is an error kind label such as `validation` or `rate_limited`.
pub fn record_operation_failed(operation: &str, reason: &str) {
    metrics::counter!(
        "quantaroute_operation_failures_total",
        "operation" => operation.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}
