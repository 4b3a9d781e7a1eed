//! JSON-RPC dispatch and the stdio server loop.

use std::io;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::{select, signal};
use tracing::{debug, error, info};

use quantaroute_lib::Gateway;

use crate::error::RpcError;
use crate::tools::{call_tool, tool_definitions};
use crate::transport::{is_disconnect, LineTransport};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "quantaroute-geocoder";

/// Stateless apart from the gateway; every message is handled independently.
#[derive(Debug)]
pub struct McpServer {
    gateway: Gateway,
}

impl McpServer {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Handle one raw line. `None` means nothing should be written back.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                debug!(error = %e, "unparsable message");
                Some(failure(Value::Null, RpcError::parse_error(e.to_string())))
            }
        }
    }

    /// Handle one decoded JSON-RPC message.
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        let Value::Object(request) = message else {
            return Some(failure(
                Value::Null,
                RpcError::invalid_request("Invalid Request: expected a JSON object"),
            ));
        };

        let id = request.get("id").cloned();
        let Some(method) = request.get("method").and_then(Value::as_str) else {
            return Some(failure(
                id.unwrap_or(Value::Null),
                RpcError::invalid_request("Invalid Request: missing method"),
            ));
        };

        // Notifications never get a response.
        let Some(id) = id else {
            debug!(method = method, "notification");
            return None;
        };

        let params = request.get("params").cloned().unwrap_or(Value::Null);
        let outcome = match method {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => call_tool(&self.gateway, &params).await,
            other => Err(RpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => success(id, result),
            Err(e) => failure(id, e),
        })
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
        "capabilities": { "tools": {} }
    })
}

fn success(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn failure(id: Value, error: RpcError) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}

/// Serve messages until EOF, Ctrl-C or client disconnect.
pub async fn run<R, W>(server: &McpServer, mut transport: LineTransport<R, W>) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("MCP server ready, waiting for requests");

    loop {
        select! {
            _ = signal::ctrl_c() => {
                info!("received shutdown signal, exiting");
                break;
            }

            line = transport.read_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("client disconnected (EOF)");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "transport read failed");
                        return Err(e);
                    }
                };

                let Some(response) = server.handle_line(&line).await else {
                    continue;
                };
                if let Err(e) = transport.write_line(&response.to_string()).await {
                    if is_disconnect(&e) {
                        info!("client disconnected (broken pipe)");
                        break;
                    }
                    return Err(e);
                }
            }
        }
    }

    info!("shutdown complete");
    Ok(())
}
