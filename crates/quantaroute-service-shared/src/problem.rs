//! Error bodies and status mapping for the REST API.
//!
//! Library errors are mapped to a status once here, from the typed error kind,
//! never by inspecting message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use quantaroute_lib::{Error as LibError, ErrorKind, HttpVerb, Operation, OperationSpec, OPERATIONS};

use crate::response::ApiResponse;

/// HTTP status for a library error.
pub fn status_for(error: &LibError) -> StatusCode {
    match error.kind() {
        ErrorKind::Validation | ErrorKind::InvalidArguments => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        ErrorKind::UnknownOperation => StatusCode::NOT_FOUND,
        ErrorKind::Backend | ErrorKind::Transport | ErrorKind::Configuration => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert a library error into the response sent to the caller.
pub fn from_lib_error(error: &LibError) -> Response {
    match error {
        LibError::NotImplemented {
            operation,
            backend_path,
        } => {
            let endpoint = Operation::from_tool_name(operation)
                .map(Operation::endpoint)
                .unwrap_or(*operation);
            not_implemented(endpoint, backend_path)
        }
        _ => ApiResponse::error(status_for(error), error.to_string()).into_response(),
    }
}

/// 501 body for an operation whose backend endpoint does not exist yet.
pub fn not_implemented(endpoint: &str, backend_path: &str) -> Response {
    let body = json!({
        "success": false,
        "error": "Not Implemented",
        "message": format!(
            "The {} endpoint is not yet implemented in the backend API. This feature is coming soon.",
            endpoint
        ),
        "endpoint": endpoint,
        "status": "experimental",
        "note": format!(
            "This feature is marked as experimental and will be available in a future release. \
             The backend endpoint {} needs to be implemented first.",
            backend_path
        ),
    });
    (StatusCode::NOT_IMPLEMENTED, Json(body)).into_response()
}

/// 404 body for an unknown endpoint or an endpoint used with the wrong method.
pub fn not_found(endpoint: &str, method: &str) -> Response {
    let shown = if endpoint.is_empty() { "(root)" } else { endpoint };
    let body = json!({
        "success": false,
        "error": format!("Endpoint '{}' not found", endpoint),
        "message": "See GET /api for available endpoints",
        "endpoint": shown,
        "method": method,
        "availableEndpoints": available_endpoints(),
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// `METHOD /api/<endpoint>[?example-query]` for one operation and verb.
pub fn usage_line(spec: &OperationSpec, verb: HttpVerb) -> String {
    let mut line = format!("{} /api/{}", verb, spec.endpoint);
    if verb == HttpVerb::Get && !spec.query_params.is_empty() {
        let query: Vec<String> = spec
            .query_params
            .iter()
            .map(|param| format!("{}={}", param.name, param.example))
            .collect();
        line.push('?');
        line.push_str(&query.join("&"));
    }
    line
}

/// Every reachable `METHOD /api/...` combination: GET routes first, then POST,
/// each in operation-table order.
pub fn available_endpoints() -> Vec<String> {
    let mut endpoints = vec!["GET /api".to_string()];
    for verb in [HttpVerb::Get, HttpVerb::Post] {
        for spec in OPERATIONS.iter().filter(|spec| spec.methods.contains(&verb)) {
            let mut line = usage_line(spec, verb);
            if !spec.enabled {
                line.push_str(" (NOT YET IMPLEMENTED)");
            }
            endpoints.push(line);
        }
    }
    endpoints
}
