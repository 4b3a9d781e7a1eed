//! Process-wide gateway configuration.
//!
//! Configuration is resolved once at startup and is read-only afterwards. The
//! fallback API key lives here; request handlers pass their own key (if any) to
//! [`GatewayConfig::resolve_credential`] instead of reading the environment.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Production backend endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.quantaroute.com";

/// Fixed connect + response timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_ENV: &str = "QUANTAROUTE_API_KEY";
pub const BASE_URL_ENV: &str = "QUANTAROUTE_BASE_URL";
pub const TIMEOUT_ENV: &str = "QUANTAROUTE_TIMEOUT_SECS";

/// Backend API key. `Debug` output never contains the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, treating empty or whitespace-only strings as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Gateway configuration shared by both front-ends.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Fallback credential used when a request does not carry its own.
    pub api_key: Option<ApiKey>,
    /// Backend base URL, without trailing slash requirements.
    pub base_url: String,
    /// Timeout applied to every backend call.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// - `QUANTAROUTE_API_KEY`: fallback credential (optional)
    /// - `QUANTAROUTE_BASE_URL`: backend base URL (default: `https://api.quantaroute.com`)
    /// - `QUANTAROUTE_TIMEOUT_SECS`: backend timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`GatewayConfig::from_env`] but reads values through `lookup`, so
    /// tests do not have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup(API_KEY_ENV).and_then(ApiKey::new);

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            config.timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a fallback credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Pick the credential for one request.
    ///
    /// A non-empty `supplied` key (e.g. the `x-api-key` header) wins over the
    /// configured fallback. Fails with [`Error::MissingCredential`] when neither
    /// is present.
    pub fn resolve_credential(&self, supplied: Option<&str>) -> Result<ApiKey> {
        supplied
            .and_then(ApiKey::new)
            .or_else(|| self.api_key.clone())
            .ok_or(Error::MissingCredential)
    }
}

/// Parse a timeout expressed in whole seconds.
pub fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Configuration(format!(
            "{} must be a positive number of seconds, got '{}'",
            TIMEOUT_ENV, raw
        ))),
    }
}
