//! Tool catalogue and `tools/call` dispatch.
//!
//! Tool names, descriptions and the enabled flag come from the shared
//! operation table; this module only attaches input schemas and wraps results
//! in MCP text content.

use schemars::{schema_for, JsonSchema};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use quantaroute_lib::{Error as LibError, Gateway, Operation, OPERATIONS};

use crate::error::{Result, RpcError, METHOD_NOT_FOUND};
use crate::types::*;

/// One entry of the `tools/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Every operation, in table order, with its JSON input schema.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    OPERATIONS
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.tool_name,
            description: spec.description,
            input_schema: input_schema(spec.operation),
        })
        .collect()
}

/// JSON schema for the arguments of `operation`.
pub fn input_schema(operation: Operation) -> Value {
    match operation {
        Operation::Geocode => schema::<GeocodeArgs>(),
        Operation::ReverseGeocode => schema::<ReverseGeocodeArgs>(),
        Operation::CoordinatesToDigiPin | Operation::LookupLocationFromCoordinates => {
            schema::<CoordinatesArgs>()
        }
        Operation::ValidateDigiPin => schema::<ValidateDigipinArgs>(),
        Operation::BatchGeocode => schema::<BatchGeocodeArgs>(),
        Operation::Autocomplete => schema::<AutocompleteArgs>(),
        Operation::LookupLocationFromDigiPin => schema::<DigipinLookupArgs>(),
        Operation::BatchLocationLookup => schema::<BatchLocationLookupArgs>(),
        Operation::FindNearbyBoundaries => schema::<NearbyBoundariesArgs>(),
        Operation::GetUsage | Operation::GetLocationStatistics | Operation::GetHealth => {
            schema::<NoArgs>()
        }
    }
}

fn schema<T: JsonSchema>() -> Value {
    let mut value = schema_for!(T).to_value();
    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("title");
    }
    value
}

/// Handle `tools/call` params `{name, arguments}`.
///
/// The call shape is checked first: a missing name or missing or non-object
/// arguments fail with invalid-params whatever the name is. Only then are
/// unknown names reported as method-not-found. Neither reaches the backend.
pub async fn call_tool(gateway: &Gateway, params: &Value) -> Result<Value> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::invalid_params("Missing tool name"))?;

    let args: &Map<String, Value> = match params.get("arguments") {
        Some(Value::Object(map)) => map,
        _ => {
            return Err(RpcError::from_lib_error(&LibError::InvalidArguments(
                "arguments must be a JSON object".to_string(),
            )))
        }
    };

    let operation = Operation::from_tool_name(name)
        .ok_or_else(|| RpcError::new(METHOD_NOT_FOUND, format!("Unknown tool: {}", name)))?;

    match gateway.execute(operation, args, None).await {
        Ok(data) => {
            info!(operation = %operation, transport = "mcp", "operation succeeded");
            Ok(text_content(&data))
        }
        Err(e) => {
            warn!(
                operation = %operation,
                transport = "mcp",
                reason = e.kind().as_str(),
                error = %e,
                "operation failed"
            );
            Err(RpcError::from_lib_error(&e))
        }
    }
}

/// Wrap `data` as a single pretty-printed text content block.
pub fn text_content(data: &Value) -> Value {
    let text = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    json!({
        "content": [
            { "type": "text", "text": text }
        ]
    })
}
