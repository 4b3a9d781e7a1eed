//! Test utilities for handler testing.
//!
//! Builds an [`AppState`] over a recording [`StubTransport`] so handler tests
//! never touch the network.

use std::sync::Arc;

use serde_json::Value;

pub use quantaroute_lib::test_utils::{StubTransport, TEST_API_KEY};
use quantaroute_lib::{Gateway, GatewayConfig};

use crate::state::AppState;

/// State whose backend answers every call with `body` and whose fallback
/// credential is [`TEST_API_KEY`].
pub fn test_state(body: Value) -> (AppState, Arc<StubTransport>) {
    state_with(Arc::new(StubTransport::responding(body)), true)
}

/// State over `stub`, with or without a fallback credential.
pub fn state_with(stub: Arc<StubTransport>, with_fallback_key: bool) -> (AppState, Arc<StubTransport>) {
    let mut config = GatewayConfig::default();
    if with_fallback_key {
        config = config.with_api_key(TEST_API_KEY);
    }
    let state = AppState::new(Gateway::new(config, stub.clone()));
    (state, stub)
}
