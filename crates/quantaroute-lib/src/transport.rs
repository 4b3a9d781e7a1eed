//! Outbound backend transport.
//!
//! [`Transport`] is the single capability the canonical client needs:
//! `call(method, path, body?, query?) -> JSON`. [`HttpTransport`] is the
//! production implementation over `reqwest`; tests substitute a stub.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::{ApiKey, GatewayConfig};
use crate::error::{Error, Result};

/// Header carrying the backend credential on every call.
pub const API_KEY_HEADER: &str = "x-api-key";

/// User agent sent with every backend call.
pub const USER_AGENT: &str = concat!("quantaroute-geocoder/", env!("CARGO_PKG_VERSION"));

/// One backend call, fully described.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Caller-supplied trailing path segment. Sent as exactly one segment, so
    /// `/`, `?`, `#` and dot segments in it never change the target path.
    pub segment: Option<String>,
    pub credential: ApiKey,
}

impl BackendRequest {
    pub fn get(path: impl Into<String>, credential: ApiKey) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
            query: Vec::new(),
            segment: None,
            credential,
        }
    }

    pub fn post(path: impl Into<String>, body: Value, credential: ApiKey) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
            query: Vec::new(),
            segment: None,
            credential,
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append `segment` to the path as a single encoded segment.
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Look up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Generic backend capability used by [`crate::client::QuantaRouteClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one backend call and return the decoded JSON body.
    ///
    /// Non-success statuses must be reported through [`classify_status`];
    /// failures without a response become [`Error::Transport`].
    async fn call(&self, request: BackendRequest) -> Result<Value>;
}

/// `reqwest`-backed transport bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from gateway configuration.
    ///
    /// The underlying connection pool is shared by every request served by the
    /// process; the configured timeout covers connect and response.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, segment: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, path));

        if let Some(segment) = segment {
            // `push` escapes `/` but silently drops bare dot segments.
            if segment == "." || segment == ".." {
                return Err(Error::InvalidArguments(format!(
                    "'{}' cannot be used as a path segment",
                    segment
                )));
            }
            url.path_segments_mut()
                .map_err(|_| {
                    Error::Configuration(format!("base URL '{}' cannot carry a path", self.base_url))
                })?
                .pop_if_empty()
                .push(segment);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, request: BackendRequest) -> Result<Value> {
        let url = self.endpoint(&request.path, request.segment.as_deref())?;
        debug!(method = %request.method, path = %request.path, "calling backend");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(API_KEY_HEADER, request.credential.expose());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        let payload = parse_body(&bytes);

        if status.is_success() {
            Ok(payload)
        } else {
            debug!(status = status.as_u16(), path = %request.path, "backend returned error status");
            Err(classify_status(status.as_u16(), &payload))
        }
    }
}

/// Map a non-success backend status onto the gateway error taxonomy.
///
/// The message is the backend body's `message` field when present, otherwise a
/// generic description of the status.
pub fn classify_status(status: u16, payload: &Value) -> Error {
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Request failed with status code {}", status));

    match status {
        401 => Error::Authentication { message },
        429 => Error::RateLimited { message },
        _ => Error::Backend { status, message },
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    let message = if error.is_timeout() {
        format!("timed out waiting for backend: {}", error)
    } else {
        error.to_string()
    };
    Error::Transport { message }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Configuration(format!("invalid base URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Configuration(format!(
            "unsupported base URL scheme '{}' in '{}'",
            other, raw
        ))),
    }
}

/// Decode a response body. Empty bodies become `null`; bodies that are not JSON
/// are returned as a JSON string.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
