//! Application state shared by the axum handlers.

use std::sync::Arc;

use quantaroute_lib::{Gateway, GatewayConfig, Result as LibResult};

/// Cheaply cloneable handle to the process-wide [`Gateway`].
///
/// ```ignore
/// use quantaroute_lib::GatewayConfig;
/// use quantaroute_service_shared::AppState;
///
/// let state = AppState::from_config(GatewayConfig::from_env()?)?;
/// let app = Router::new().route("/api", any(api_root)).with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    /// Build the HTTP transport for `config` and wrap it in a gateway.
    pub fn from_config(config: GatewayConfig) -> LibResult<Self> {
        let gateway = Gateway::from_config(config)?;
        tracing::info!(
            base_url = %gateway.config().base_url,
            timeout_secs = gateway.config().timeout.as_secs(),
            fallback_key = gateway.config().has_api_key(),
            "gateway configured"
        );
        Ok(Self::new(gateway))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.gateway.config().base_url)
            .field("has_api_key", &self.gateway.config().has_api_key())
            .finish()
    }
}
