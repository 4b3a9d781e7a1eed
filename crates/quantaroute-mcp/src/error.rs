//! JSON-RPC error objects for the MCP server.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use quantaroute_lib::{Error as LibError, ErrorKind};

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, RpcError>;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 error object, serialized as the `error` member of a response.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[error("{message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", reason.into()))
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, reason)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Unknown method: {}", method))
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, reason)
    }

    /// Map a gateway failure onto a JSON-RPC error.
    ///
    /// Rate-limit, backend and transport failures already say what went
    /// wrong, so their message is passed through unchanged. Only failures
    /// with no classification of their own get the "Tool execution failed"
    /// prefix.
    pub fn from_lib_error(error: &LibError) -> Self {
        match error {
            LibError::Validation { field, .. } => {
                return Self::new(INVALID_PARAMS, error.to_string())
                    .with_data(json!({ "field": field }));
            }
            LibError::Backend { status, .. } => {
                return Self::new(INTERNAL_ERROR, error.to_string())
                    .with_data(json!({ "status": status }));
            }
            _ => {}
        }
        match error.kind() {
            ErrorKind::Validation | ErrorKind::InvalidArguments => {
                Self::new(INVALID_PARAMS, error.to_string())
            }
            ErrorKind::Authentication => Self::new(INVALID_REQUEST, error.to_string()),
            ErrorKind::UnknownOperation => Self::new(METHOD_NOT_FOUND, error.to_string()),
            ErrorKind::RateLimited | ErrorKind::Backend | ErrorKind::Transport => {
                Self::new(INTERNAL_ERROR, error.to_string())
            }
            ErrorKind::NotImplemented | ErrorKind::Configuration => Self::new(
                INTERNAL_ERROR,
                format!("Tool execution failed: {}", error),
            ),
        }
    }
}
