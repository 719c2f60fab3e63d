//! Rides HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /rides` - Validate and store a ride, answer `[ride]`
//! - `GET /rides?page&limit` - One page of rides ordered by `rideID`
//! - `GET /rides/{id}` - A single ride as `[ride]`
//! - `GET /health` - Plain text `Healthy`
//! - `GET /health/live`, `GET /health/ready` - JSON probes
//! - `GET /metrics` - Prometheus metrics (unless disabled)
//! - `GET /documentation` - Swagger UI over `/api-docs/openapi.json`
//!
//! Rides endpoints always answer HTTP 200. Failures carry
//! `{"error_code", "message"}` instead of rows.

pub mod docs;

use axum::{Router, extract::State, routing::get};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rides_service_shared::{
    AppState, MetricsConfig, MetricsLayer, PageParams, RidesResponse, ValidRide, ValidRideId,
    health, health_live, health_ready, metrics_handler, record_ride_created,
    record_rides_returned,
};

use crate::docs::ApiDoc;

/// Build the application router around `state`.
pub fn app(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/rides", get(list_rides).post(create_ride))
        .route("/rides/{id}", get(get_ride))
        .route("/health", get(health_text))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router
        .merge(SwaggerUi::new("/documentation").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(MetricsLayer)
        .with_state(state)
}

/// Store a new ride.
#[utoipa::path(
    post,
    path = "/rides",
    tags = ["rides"],
    request_body = docs::RideRequestSchema,
    responses(
        (status = 200, description = "The stored ride as a one-element array, or an error body", body = docs::RidesResultSchema)
    )
)]
pub async fn create_ride(State(state): State<AppState>, ValidRide(ride): ValidRide) -> RidesResponse {
    let result = state.run(move |service| service.create_ride(&ride)).await;
    if let Ok([ride, ..]) = result.as_deref() {
        record_ride_created();
        info!(ride_id = %ride.ride_id, "ride stored");
    }
    result.into()
}

/// List rides one page at a time.
#[utoipa::path(
    get,
    path = "/rides",
    tags = ["rides"],
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Rides per page")
    ),
    responses(
        (status = 200, description = "Rides ordered by rideID, or an error body", body = docs::RidesResultSchema)
    )
)]
pub async fn list_rides(State(state): State<AppState>, PageParams(query): PageParams) -> RidesResponse {
    let result = state.run(move |service| service.list_rides(query)).await;
    if let Ok(rides) = &result {
        record_rides_returned(rides.len(), "list");
    }
    result.into()
}

/// Fetch one ride by identifier.
#[utoipa::path(
    get,
    path = "/rides/{id}",
    tags = ["rides"],
    params(("id" = i64, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "The ride as a one-element array, or an error body", body = docs::RidesResultSchema)
    )
)]
pub async fn get_ride(State(state): State<AppState>, ValidRideId(ride_id): ValidRideId) -> RidesResponse {
    let result = state.run(move |service| service.get_ride_by_id(ride_id)).await;
    if let Ok(rides) = &result {
        record_rides_returned(rides.len(), "get");
    }
    result.into()
}

/// Liveness in plain text.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses((status = 200, description = "Always `Healthy`", body = String, content_type = "text/plain"))
)]
pub async fn health_text() -> &'static str {
    health().await
}
