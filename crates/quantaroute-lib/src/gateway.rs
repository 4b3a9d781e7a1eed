//! Shared dispatch core used by both front-ends.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::QuantaRouteClient;
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::transport::{HttpTransport, Transport};
use crate::validation;

/// Process-wide gateway: configuration plus one shared backend transport.
///
/// Cheap to share behind an `Arc`; it holds no per-request state.
pub struct Gateway {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Build a gateway that talks to the configured backend over HTTP.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Execute one operation.
    ///
    /// Order of checks: disabled operations fail first, then the input contract,
    /// then credential resolution. The backend is contacted only when all three
    /// pass, and at most once.
    pub async fn execute(
        &self,
        operation: Operation,
        args: &Map<String, Value>,
        supplied_credential: Option<&str>,
    ) -> Result<Value> {
        let spec = operation.spec();
        if !spec.enabled {
            debug!(operation = %operation, "operation disabled");
            return Err(Error::NotImplemented {
                operation: spec.tool_name,
                backend_path: spec.backend_path,
            });
        }

        let input = validation::validate(operation, args).inspect_err(|e| {
            debug!(operation = %operation, field = e.field().unwrap_or(""), "validation failed");
        })?;

        let credential = self.config.resolve_credential(supplied_credential)?;
        let client = QuantaRouteClient::new(Arc::clone(&self.transport), credential);

        match client.invoke(&input).await {
            Ok(value) => {
                debug!(operation = %operation, "operation completed");
                Ok(value)
            }
            Err(e) => {
                warn!(operation = %operation, kind = e.kind().as_str(), error = %e, "backend call failed");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::{stub_gateway, StubTransport};
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_disabled_operation_never_validates_or_calls_backend() {
        let stub = Arc::new(StubTransport::responding(json!({})));
        let gateway = stub_gateway(stub.clone());

        // Invalid input still reports "not implemented".
        let err = gateway
            .execute(Operation::FindNearbyBoundaries, &args(json!({})), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotImplemented { .. }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validation_precedes_credential_check() {
        let stub = Arc::new(StubTransport::responding(json!({})));
        let gateway = Gateway::new(GatewayConfig::default(), stub.clone());

        let err = gateway
            .execute(Operation::Geocode, &args(json!({})), None)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("address"));

        let err = gateway
            .execute(Operation::Geocode, &args(json!({"address": "x"})), None)
            .await
            .unwrap_err();
        assert_eq!(err, Error::MissingCredential);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_supplied_credential_reaches_backend() {
        let stub = Arc::new(StubTransport::responding(json!({"data": {"status": "ok"}})));
        let gateway = stub_gateway(stub.clone());

        let value = gateway
            .execute(Operation::GetHealth, &Map::new(), Some("header-key"))
            .await
            .unwrap();

        assert_eq!(value, json!({"status": "ok"}));
        assert_eq!(stub.last_request().unwrap().credential.expose(), "header-key");
    }

    #[tokio::test]
    async fn test_backend_failure_is_propagated() {
        let stub = Arc::new(StubTransport::failing_with_status(
            429,
            json!({"message": "quota exhausted"}),
        ));
        let gateway = stub_gateway(stub.clone());

        let err = gateway
            .execute(Operation::GetUsage, &Map::new(), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::RateLimited {
                message: "quota exhausted".into()
            }
        );
        assert_eq!(stub.call_count(), 1);
    }

    /// The field `{}` fails on, and the smallest arguments that pass
    /// validation, for every operation.
    fn input_table(operation: Operation) -> (Option<&'static str>, Value) {
        match operation {
            Operation::Geocode => (Some("address"), json!({"address": "India Gate"})),
            Operation::ReverseGeocode
            | Operation::ValidateDigiPin
            | Operation::LookupLocationFromDigiPin => {
                (Some("digipin"), json!({"digipin": "39J-438-TJC7"}))
            }
            Operation::CoordinatesToDigiPin
            | Operation::LookupLocationFromCoordinates
            | Operation::FindNearbyBoundaries => (
                Some("latitude"),
                json!({"latitude": 28.6129, "longitude": 77.2295}),
            ),
            Operation::BatchGeocode => (Some("addresses"), json!({"addresses": ["India Gate"]})),
            Operation::Autocomplete => (Some("query"), json!({"query": "Del"})),
            Operation::BatchLocationLookup => (
                Some("locations"),
                json!({"locations": [{"digipin": "39J-438-TJC7"}]}),
            ),
            Operation::GetUsage | Operation::GetLocationStatistics | Operation::GetHealth => {
                (None, json!({}))
            }
        }
    }

    #[tokio::test]
    async fn test_every_required_field_is_named_before_backend_call() {
        for operation in Operation::all().filter(|op| op.is_enabled()) {
            let (field, _) = input_table(operation);
            let Some(field) = field else { continue };

            let stub = Arc::new(StubTransport::responding(json!({})));
            let gateway = stub_gateway(stub.clone());
            let err = gateway
                .execute(operation, &Map::new(), None)
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Validation, "{}", operation);
            assert_eq!(err.field(), Some(field), "{}", operation);
            assert_eq!(stub.call_count(), 0, "{}", operation);
        }
    }

    #[tokio::test]
    async fn test_every_operation_classifies_auth_and_rate_limit_failures() {
        let cases = [
            (401, ErrorKind::Authentication),
            (429, ErrorKind::RateLimited),
        ];
        for operation in Operation::all().filter(|op| op.is_enabled()) {
            let (_, minimal) = input_table(operation);
            for (status, kind) in cases {
                let stub = Arc::new(StubTransport::failing_with_status(
                    status,
                    json!({"message": "refused"}),
                ));
                let gateway = stub_gateway(stub.clone());
                let err = gateway
                    .execute(operation, &args(minimal.clone()), None)
                    .await
                    .unwrap_err();

                assert_eq!(err.kind(), kind, "{} with {}", operation, status);
                assert_eq!(stub.call_count(), 1, "{} with {}", operation, status);
            }
        }
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let stub = Arc::new(StubTransport::responding(json!({})));
        let gateway = stub_gateway(stub);
        let rendered = format!("{:?}", gateway);
        assert!(rendered.contains("Gateway"));
        assert!(!rendered.contains(crate::test_utils::TEST_API_KEY));
    }
}
