//! QuantaRoute geocoder REST gateway.
//!
//! # Endpoints
//!
//! - `GET /api` - API documentation (no credential needed)
//! - `GET|POST /api/{endpoint}` - one backend operation per endpoint, see
//!   [`quantaroute_lib::OPERATIONS`]
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` / `GET /health/ready` - process probes
//!
//! Every response carries permissive CORS headers; `OPTIONS` on any path is a
//! bodiless 200.

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use quantaroute_lib::{HttpVerb, Operation};
use quantaroute_service_shared::{
    ApiResponse, AppState, MetricsLayer, RequestId, api_documentation, cors::cors,
    extract_or_generate_request_id, from_lib_error, health_live, health_ready, metrics_handler,
    not_found, record_operation, record_operation_failed,
    request::{args_from_body, args_from_query, path_segments, supplied_credential},
};

/// Largest request body read for POST operations.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Build the service router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", any(api_root))
        .route("/api/", any(api_root))
        .route("/api/{*path}", any(api_path))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .fallback(fallback)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

async fn api_root(State(state): State<AppState>, request: Request) -> Response {
    dispatch(state, None, request).await
}

async fn api_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    dispatch(state, Some(path.as_str()), request).await
}

/// Paths the router does not know. Anything under `/api` still goes through
/// the dispatcher using the raw path.
async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        return dispatch(state, None, request).await;
    }
    not_found(path.trim_start_matches('/'), request.method().as_str())
}

async fn dispatch(state: AppState, captured: Option<&str>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let request_id = parts
        .extensions
        .get::<RequestId>()
        .cloned()
        .unwrap_or_else(|| extract_or_generate_request_id(&parts.headers));

    let segments = path_segments(captured, parts.uri.path());
    let endpoint = segments.first().map(String::as_str).unwrap_or("");
    let verb = HttpVerb::parse(parts.method.as_str());

    if endpoint.is_empty() && verb == Some(HttpVerb::Get) {
        return Json(api_documentation()).into_response();
    }

    let resolved =
        verb.and_then(|verb| Operation::from_endpoint(endpoint, verb).map(|op| (verb, op)));
    let Some((verb, operation)) = resolved else {
        info!(
            request_id = %request_id,
            endpoint = endpoint,
            method = %parts.method,
            "unknown endpoint"
        );
        return not_found(endpoint, parts.method.as_str());
    };

    let args = match verb {
        HttpVerb::Get => args_from_query(operation.spec(), &parts.uri),
        HttpVerb::Post => match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => args_from_body(&bytes),
            Err(e) => {
                record_operation_failed(operation.tool_name(), "body_too_large");
                warn!(
                    request_id = %request_id,
                    operation = %operation,
                    transport = "http",
                    limit = MAX_BODY_BYTES,
                    error = %e,
                    "request body rejected"
                );
                return body_too_large();
            }
        },
    };

    let credential = supplied_credential(&parts.headers);
    match state.gateway().execute(operation, &args, credential).await {
        Ok(data) => {
            record_operation(operation.tool_name());
            info!(
                request_id = %request_id,
                operation = %operation,
                transport = "http",
                "operation succeeded"
            );
            ApiResponse::success(data).into_response()
        }
        Err(e) => {
            let reason = e.kind().as_str();
            record_operation_failed(operation.tool_name(), reason);
            warn!(
                request_id = %request_id,
                operation = %operation,
                transport = "http",
                reason = reason,
                error = %e,
                "operation failed"
            );
            from_lib_error(&e)
        }
    }
}

/// A body that could not be read in full, almost always because it is larger
/// than [`MAX_BODY_BYTES`]. Nothing reaches the gateway in that case.
fn body_too_large() -> Response {
    ApiResponse::error(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("Request body exceeds the {} byte limit", MAX_BODY_BYTES),
    )
    .with_message("Split large batches into several requests")
    .into_response()
}
