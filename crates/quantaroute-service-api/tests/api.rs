//! In-process tests of the REST router over a stub backend.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use quantaroute_service_api::router;
use quantaroute_service_shared::test_utils::{StubTransport, TEST_API_KEY, state_with, test_state};

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: Router, request: Request<Body>) -> Reply {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Reply {
        status,
        headers,
        body,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_cors(reply: &Reply) {
    assert_eq!(reply.headers["access-control-allow-origin"], "*");
    assert_eq!(
        reply.headers["access-control-allow-methods"],
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        reply.headers["access-control-allow-headers"],
        "Content-Type, Authorization, x-api-key"
    );
}

#[tokio::test]
async fn root_serves_documentation_without_credential() {
    let stub = Arc::new(StubTransport::responding(json!({})));
    let (state, stub) = state_with(stub, false);

    for uri in ["/api", "/api/"] {
        let reply = send(router(state.clone()), get(uri)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["success"], true);
        assert_eq!(reply.body["message"], "QuantaRoute Geocoder REST API");
        assert!(reply.body["endpoints"]["POST /api/geocode"].is_string());
        assert_cors(&reply);
    }
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn options_is_bodiless_preflight_on_any_path() {
    let (state, stub) = test_state(json!({}));

    for uri in ["/api/geocode", "/api/nowhere", "/metrics"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let reply = send(router(state.clone()), request).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, Value::Null);
        assert_cors(&reply);
    }
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn geocode_success_is_wrapped_in_envelope() {
    let (state, stub) = test_state(json!({"success": true, "data": {"digipin": "39J-438-TJC7"}}));

    let reply = send(
        router(state),
        post("/api/geocode", json!({"address": "India Gate, New Delhi"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!({"success": true, "data": {"digipin": "39J-438-TJC7"}})
    );
    assert_cors(&reply);

    let request = stub.last_request().unwrap();
    assert_eq!(request.path, "/v1/digipin/geocode");
    assert_eq!(request.credential.expose(), TEST_API_KEY);
}

#[tokio::test]
async fn header_credential_overrides_fallback() {
    let (state, stub) = test_state(json!({"data": {"status": "healthy"}}));

    let request = Request::builder()
        .uri("/api/health")
        .header("x-api-key", "caller-key")
        .body(Body::empty())
        .unwrap();
    let reply = send(router(state), request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(stub.last_request().unwrap().credential.expose(), "caller-key");
}

#[tokio::test]
async fn missing_credential_is_401_without_backend_call() {
    let stub = Arc::new(StubTransport::responding(json!({})));
    let (state, stub) = state_with(stub, false);

    let reply = send(
        router(state),
        post("/api/reverse-geocode", json!({"digipin": "39J-438-TJC7"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["success"], false);
    assert!(
        reply.body["error"]
            .as_str()
            .unwrap()
            .contains("API key is required")
    );
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn validation_failure_is_400_naming_field() {
    let (state, stub) = test_state(json!({}));

    let reply = send(
        router(state.clone()),
        post("/api/coordinates-to-digipin", json!({"latitude": 12.97})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].as_str().unwrap().contains("longitude"));

    let reply = send(
        router(state),
        post("/api/lookup-location-from-coordinates", json!({"latitude": 90.0001, "longitude": 0})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].as_str().unwrap().contains("latitude"));

    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn malformed_body_is_treated_as_empty_object() {
    let (state, stub) = test_state(json!({}));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/batch-geocode")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let reply = send(router(state), request).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].as_str().unwrap().contains("addresses"));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn batch_of_101_is_rejected() {
    let (state, stub) = test_state(json!({}));
    let locations: Vec<Value> = (0..101).map(|i| json!({"digipin": i.to_string()})).collect();

    let reply = send(
        router(state),
        post("/api/batch-location-lookup", json!({ "locations": locations })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn oversized_body_is_413_naming_the_limit() {
    let (state, stub) = test_state(json!({}));
    let address = "x".repeat(30_000);
    let addresses: Vec<Value> = (0..100).map(|_| json!(address)).collect();
    let body = json!({ "addresses": addresses });
    assert!(body.to_string().len() > quantaroute_service_api::MAX_BODY_BYTES);

    let reply = send(router(state), post("/api/batch-geocode", body)).await;

    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(reply.body["success"], false);
    assert!(reply.body["error"]
        .as_str()
        .unwrap()
        .contains(&quantaroute_service_api::MAX_BODY_BYTES.to_string()));
    assert!(reply.body["message"].is_string());
    assert_cors(&reply);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn nearby_boundaries_is_501_before_validation_or_auth() {
    let stub = Arc::new(StubTransport::responding(json!({})));
    let (state, stub) = state_with(stub, false);

    let reply = send(
        router(state),
        post("/api/find-nearby-boundaries", json!({"latitude": "bad"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(reply.body["success"], false);
    assert_eq!(reply.body["error"], "Not Implemented");
    assert_eq!(reply.body["endpoint"], "find-nearby-boundaries");
    assert_eq!(reply.body["status"], "experimental");
    assert!(
        reply.body["note"]
            .as_str()
            .unwrap()
            .contains("/v1/location/nearby")
    );
    assert_cors(&reply);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn unknown_endpoint_lists_available_endpoints() {
    let (state, stub) = test_state(json!({}));

    let reply = send(router(state), get("/api/teleport")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "Endpoint 'teleport' not found");
    assert_eq!(reply.body["endpoint"], "teleport");
    assert_eq!(reply.body["method"], "GET");
    let available = reply.body["availableEndpoints"].as_array().unwrap();
    assert!(available.contains(&json!("GET /api/autocomplete?q=query&limit=5")));
    assert_cors(&reply);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn wrong_method_is_404() {
    let (state, stub) = test_state(json!({}));

    let reply = send(router(state.clone()), get("/api/geocode")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["method"], "GET");

    let reply = send(router(state.clone()), post("/api", json!({}))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["endpoint"], "(root)");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/usage")
        .body(Body::empty())
        .unwrap();
    let reply = send(router(state), request).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["method"], "DELETE");

    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn validate_digipin_get_and_post_reach_same_backend_call() {
    let (state, stub) = test_state(json!({"data": {"isValid": true}}));

    let via_get = send(
        router(state.clone()),
        get("/api/validate-digipin?digipin=39J-438-TJC7"),
    )
    .await;
    let via_post = send(
        router(state),
        post("/api/validate-digipin", json!({"digipin": "39J-438-TJC7"})),
    )
    .await;

    assert_eq!(via_get.status, StatusCode::OK);
    assert_eq!(via_get.body, via_post.body);

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert_eq!(requests[0].path, "/v1/digipin/validate");
    assert_eq!(requests[0].segment.as_deref(), Some("39J-438-TJC7"));
}

#[tokio::test]
async fn validate_digipin_query_value_stays_one_backend_segment() {
    let (state, stub) = test_state(json!({"data": {"isValid": false}}));

    let reply = send(
        router(state),
        get("/api/validate-digipin?digipin=..%2F..%2Fv1%2Flocation%2Fstats"),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    let request = stub.last_request().unwrap();
    assert_eq!(request.path, "/v1/digipin/validate");
    assert_eq!(request.segment.as_deref(), Some("../../v1/location/stats"));
}

#[tokio::test]
async fn validate_digipin_get_without_query_is_400() {
    let (state, stub) = test_state(json!({}));

    let reply = send(router(state), get("/api/validate-digipin")).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].as_str().unwrap().contains("digipin"));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn autocomplete_limit_is_capped_not_rejected() {
    let (state, stub) = test_state(json!({"data": [{"address": "Mumbai"}]}));

    let reply = send(router(state.clone()), get("/api/autocomplete?q=Mumbai&limit=11")).await;
    assert_eq!(reply.status, StatusCode::OK);
    let request = stub.last_request().unwrap();
    assert_eq!(request.query_value("q"), Some("Mumbai"));
    assert_eq!(request.query_value("limit"), Some("10"));

    let reply = send(router(state), get("/api/autocomplete?q=Mu")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn backend_statuses_map_to_http_statuses() {
    let cases = [
        (401, StatusCode::UNAUTHORIZED, "Authentication failed: Invalid API key"),
        (429, StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded: Invalid API key"),
        (503, StatusCode::INTERNAL_SERVER_ERROR, "API error (503): Invalid API key"),
    ];

    for (backend_status, expected, message) in cases {
        let stub = Arc::new(StubTransport::failing_with_status(
            backend_status,
            json!({"message": "Invalid API key"}),
        ));
        let (state, _) = state_with(stub, true);

        for request in [get("/api/usage"), post("/api/geocode", json!({"address": "x"}))] {
            let reply = send(router(state.clone()), request).await;
            assert_eq!(reply.status, expected);
            assert_eq!(
                reply.body,
                json!({"success": false, "error": message})
            );
            assert_cors(&reply);
        }
    }
}

#[tokio::test]
async fn unreachable_backend_is_500() {
    let stub = Arc::new(StubTransport::unreachable("connection refused"));
    let (state, _) = state_with(stub, true);

    let reply = send(router(state), get("/api/location-statistics")).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["error"], "Request failed: connection refused");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (state, _) = test_state(json!({}));

    let request = Request::builder()
        .uri("/api")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let reply = send(router(state.clone()), request).await;
    assert_eq!(reply.headers["x-request-id"], "trace-me-123");

    let reply = send(router(state), get("/api")).await;
    assert_eq!(reply.headers["x-request-id"].len(), 36);
}

#[tokio::test]
async fn health_probes_report_process_state() {
    let stub = Arc::new(StubTransport::responding(json!({})));
    let (state, stub) = state_with(stub, false);

    let live = send(router(state.clone()), get("/health/live")).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body["status"], "ok");

    let ready = send(router(state), get("/health/ready")).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["status"], "degraded");
    assert_eq!(ready.body["credential_configured"], false);
    assert_eq!(ready.body["backend"], "https://api.quantaroute.com");

    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn paths_outside_api_are_404() {
    let (state, _) = test_state(json!({}));

    let reply = send(router(state), get("/favicon.ico")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["endpoint"], "favicon.ico");
    assert_cors(&reply);
}
