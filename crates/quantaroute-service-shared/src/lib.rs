//! Shared HTTP infrastructure for the QuantaRoute geocoder gateway.
//!
//! - [`AppState`]: handle to the process-wide gateway
//! - [`health`]: liveness/readiness probes for the process
//! - [`ApiResponse`] and [`from_lib_error`]: the `/api` JSON envelope and error mapping
//! - [`request`]: path, query and body parsing into operation arguments
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`] and [`cors`]: request tracking and CORS
//!
//! # Architecture
//!
//! Handlers are thin: every operation, rule and backend call lives in
//! `quantaroute-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Resolve endpoint + method through the operation table    │
//! │  - Collect arguments from query string or JSON body         │
//! │  - Call Gateway::execute                                    │
//! │  - Map the result onto the JSON envelope                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds state over a stub backend. Enable the
//! `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod cors;
mod docs;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
pub mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use docs::api_documentation;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_operation, record_operation_failed, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{available_endpoints, from_lib_error, not_found, not_implemented, status_for};
pub use response::ApiResponse;
pub use state::AppState;
