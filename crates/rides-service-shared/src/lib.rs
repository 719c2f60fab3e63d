//! Shared infrastructure for the rides HTTP microservice.
//!
//! This crate provides the HTTP glue around `rides-lib`:
//!
//! - [`AppState`]: the injected [`rides_lib::RideService`] plus blocking-task dispatch
//! - [`request`]: axum extractors that normalize raw input or reject it
//! - [`RidesResponse`]: the response mapper (always HTTP 200)
//! - [`health`]: plain-text and JSON health probes
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`ServiceConfig`]: environment-driven service configuration
//!
//! # Architecture
//!
//! Handlers stay thin; validation and storage live in `rides-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Extract + normalize (rejection renders VALIDATION_ERROR) │
//! │  - Run RideService on the blocking pool                     │
//! │  - Map rows or RideError to a 200 JSON body                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides fixtures, seeded state and a failing
//! store. Enable the `test-utils` feature to access it from dependent crates.

pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use health::{health, health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_request_failed, record_ride_created,
    record_rides_returned, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use request::{PageParams, ValidRide, ValidRideId};
pub use response::{ErrorBody, RidesResponse};
pub use state::{AppState, AppStateError, DynRideStore};
