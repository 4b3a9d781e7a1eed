//! Static documentation payload served at `GET /api`.

use serde_json::{json, Map, Value};

use quantaroute_lib::{HttpVerb, OPERATIONS};

use crate::problem::usage_line;

pub const DOCUMENTATION_URL: &str = "https://github.com/mapdevsaikat/quantaroute-geocoder";
pub const DEVELOPER_PORTAL_URL: &str = "https://developers.quantaroute.com";

/// Describe the API. Needs no credential and never calls the backend.
pub fn api_documentation() -> Value {
    let mut endpoints = Map::new();
    endpoints.insert(
        "GET /api".to_string(),
        Value::String("Get API information (this endpoint)".to_string()),
    );
    for verb in [HttpVerb::Get, HttpVerb::Post] {
        for spec in OPERATIONS.iter().filter(|spec| spec.methods.contains(&verb)) {
            endpoints.insert(usage_line(spec, verb), Value::String(spec.summary.to_string()));
        }
    }

    json!({
        "success": true,
        "message": "QuantaRoute Geocoder REST API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": DOCUMENTATION_URL,
        "authentication": {
            "method": "API Key",
            "header": "x-api-key",
            "env": "QUANTAROUTE_API_KEY",
            "note": format!(
                "API key can be provided via x-api-key header or QUANTAROUTE_API_KEY \
                 environment variable. Get your API key from {}",
                DEVELOPER_PORTAL_URL
            ),
            "getApiKey": DEVELOPER_PORTAL_URL,
        },
        "endpoints": endpoints,
    })
}
