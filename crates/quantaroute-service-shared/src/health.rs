//! Liveness and readiness probes for the gateway process itself.
//!
//! These never touch the backend; `/api/health` is the backend health proxy.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok`, or `degraded` when no fallback credential is configured.
    pub status: String,
    pub service: String,
    pub version: String,
    /// RFC 3339 time the probe was answered.
    pub checked_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_configured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            checked_at: chrono::Utc::now().to_rfc3339(),
            credential_configured: None,
            backend: None,
        }
    }

    /// Readiness report. Without a fallback credential the gateway still serves
    /// callers that send `x-api-key`, so this is reported as `degraded`.
    pub fn ready(service: &str, version: &str, credential_configured: bool, backend: &str) -> Self {
        Self {
            status: if credential_configured { "ok" } else { "degraded" }.to_string(),
            credential_configured: Some(credential_configured),
            backend: Some(backend.to_string()),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health/live`
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.gateway().config();
    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.has_api_key(),
        &config.base_url,
    );
    (StatusCode::OK, Json(status))
}
