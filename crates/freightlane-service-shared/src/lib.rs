//! Shared infrastructure for Freightlane HTTP microservices.
//!
//! This crate provides the HTTP glue around `freightlane-lib`:
//!
//! - [`AppState`]: a configured [`freightlane_lib::FreightPlanner`] shared by all handlers
//! - [`health`]: liveness/readiness handlers for Kubernetes probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: wrapper for successful responses with content type
//! - [`metrics`]: Prometheus metrics and route planning counters
//! - [`logging`]: structured JSON or text logging setup
//! - [`middleware`]: request correlation and HTTP metrics middleware
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; segmentation, provider fan-out and validation all
//! happen in `freightlane-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call FreightPlanner::plan_route                          │
//! │  - Format response / problem details                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    failure_reason, init_metrics, metrics_handler, record_route_failed, record_route_planned,
    MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_LOCATION_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE,
};
pub use request::{PlanRouteRequest, Validate, MAX_LOCATION_NAME_LEN};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};
