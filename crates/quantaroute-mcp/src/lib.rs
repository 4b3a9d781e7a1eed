//! MCP (Model Context Protocol) server for the QuantaRoute geocoder
//!
//! Exposes every gateway operation as an MCP tool over stdio using
//! line-delimited JSON-RPC 2.0. All logging goes to stderr so stdout carries
//! only protocol messages.
//!
//! # Architecture
//!
//! - `server`: JSON-RPC dispatch and the read/respond loop
//! - `tools`: tool catalogue and `tools/call` handling
//! - `types`: typed tool arguments used to publish input schemas
//! - `transport`: line framing over any async reader/writer
//! - `error`: JSON-RPC error objects and gateway error mapping

#![deny(warnings)]

pub mod error;
pub mod server;
pub mod tools;
pub mod transport;
pub mod types;

pub use error::{Result, RpcError};
pub use server::{run, McpServer};
pub use transport::{LineTransport, StdioTransport};
