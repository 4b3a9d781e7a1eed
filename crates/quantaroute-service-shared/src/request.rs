//! Turning an HTTP request into an endpoint name plus an argument object.
//!
//! GET arguments come from the query string through the operation table's
//! query-parameter mapping; POST arguments come from the JSON body. A body that
//! is missing, malformed or not an object becomes an empty object, so the
//! operation's own validation reports the first missing field.

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use serde_json::{Map, Number, Value};

use quantaroute_lib::transport::API_KEY_HEADER;
use quantaroute_lib::OperationSpec;

/// Path segments below `/api`.
///
/// `captured` is the router's wildcard capture; when it is absent or empty the
/// segments are recovered from the raw path by stripping the `/api` prefix.
pub fn path_segments(captured: Option<&str>, raw_path: &str) -> Vec<String> {
    let source = match captured.filter(|c| !c.trim_matches('/').is_empty()) {
        Some(captured) => captured,
        None => raw_path.strip_prefix("/api").unwrap_or(raw_path),
    };
    source
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Build the argument object for a GET request.
///
/// Only parameters declared for the operation are copied. Numeric parameters
/// that parse as numbers become JSON numbers; anything else stays a string and
/// is left for validation to reject.
pub fn args_from_query(spec: &OperationSpec, uri: &Uri) -> Map<String, Value> {
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default();

    let mut args = Map::new();
    for param in spec.query_params {
        if let Some((_, raw)) = pairs.iter().find(|(name, _)| name == param.name) {
            let value = if param.numeric {
                numeric_value(raw)
            } else {
                Value::String(raw.clone())
            };
            args.insert(param.field.to_string(), value);
        }
    }
    args
}

fn numeric_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::Number(integer.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Build the argument object for a POST request.
pub fn args_from_body(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// The caller's `x-api-key` header, if present and valid UTF-8.
pub fn supplied_credential(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}
