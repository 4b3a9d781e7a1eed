//! QuantaRoute geocoder gateway core.
//!
//! This crate owns everything both front-ends share: the operation table, the
//! per-operation input rules, the canonical backend client and the error
//! taxonomy. The HTTP service and the MCP server are thin adapters over
//! [`Gateway::execute`] and must not re-implement any of it.

#![deny(warnings)]

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod operation;
pub mod transport;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{unwrap_envelope, QuantaRouteClient};
pub use config::{ApiKey, GatewayConfig};
pub use error::{Error, ErrorKind, Result};
pub use gateway::Gateway;
pub use operation::{HttpVerb, Operation, OperationSpec, QueryParam, MAX_BATCH_SIZE, OPERATIONS};
pub use transport::{classify_status, BackendRequest, HttpTransport, Transport};
pub use validation::{validate, OperationInput};
