//! Test utilities for exercising the gateway without a network.
//!
//! [`StubTransport`] stands in for the backend: it records every request it
//! receives and answers with a canned body or a canned failure. Enable the
//! `test-utils` feature to use it from dependent crates.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::transport::{classify_status, BackendRequest, Transport};

/// Fallback credential configured by [`stub_gateway`].
pub const TEST_API_KEY: &str = "test-api-key";

#[derive(Debug, Clone)]
enum Outcome {
    Respond(Value),
    Status { status: u16, body: Value },
    Unreachable(String),
}

/// Recording backend stub.
#[derive(Debug)]
pub struct StubTransport {
    outcome: Outcome,
    requests: Mutex<Vec<BackendRequest>>,
}

impl StubTransport {
    /// Answer every call with `body` (as if the backend returned 200).
    pub fn responding(body: Value) -> Self {
        Self::with_outcome(Outcome::Respond(body))
    }

    /// Answer every call with a non-success `status` and `body`.
    pub fn failing_with_status(status: u16, body: Value) -> Self {
        Self::with_outcome(Outcome::Status { status, body })
    }

    /// Fail every call as if the backend could not be reached.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Unreachable(message.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of backend calls observed so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<BackendRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn call(&self, request: BackendRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request);
        match &self.outcome {
            Outcome::Respond(body) => Ok(body.clone()),
            Outcome::Status { status, body } => Err(classify_status(*status, body)),
            Outcome::Unreachable(message) => Err(Error::Transport {
                message: message.clone(),
            }),
        }
    }
}

/// Gateway over `stub` with [`TEST_API_KEY`] as its fallback credential.
pub fn stub_gateway(stub: Arc<StubTransport>) -> Gateway {
    Gateway::new(GatewayConfig::default().with_api_key(TEST_API_KEY), stub)
}
