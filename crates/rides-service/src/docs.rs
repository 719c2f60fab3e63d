//! OpenAPI document for the rides API.
//!
//! Wire types live in `rides-lib` without any utoipa coupling; the schema
//! structs here mirror their serialized shape for documentation only.

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// A stored ride as returned by every rides endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = Ride)]
#[allow(dead_code)]
pub struct RideSchema {
    #[serde(rename = "rideID")]
    #[schema(example = 1, minimum = 1)]
    ride_id: i64,
    #[schema(example = 48.858222)]
    start_lat: f64,
    #[schema(example = 2.2945)]
    start_long: f64,
    #[schema(example = 48.861111)]
    end_lat: f64,
    #[schema(example = 2.335833)]
    end_long: f64,
    #[schema(example = "Dominic Toretto")]
    rider_name: String,
    #[schema(example = "The Transporter")]
    driver_name: String,
    #[schema(example = "Audi A8 W12")]
    driver_vehicle: String,
    #[schema(example = "2021-09-18 23:43:53")]
    created: String,
}

/// Body of `POST /rides`. Coordinates may also be sent as numeric strings.
#[derive(Serialize, ToSchema)]
#[schema(as = RideRequest)]
#[allow(dead_code)]
pub struct RideRequestSchema {
    #[schema(example = 48.858222)]
    start_lat: f64,
    #[schema(example = 2.2945)]
    start_long: f64,
    #[schema(example = 48.861111)]
    end_lat: f64,
    #[schema(example = 2.335833)]
    end_long: f64,
    #[schema(example = "Dominic Toretto", min_length = 1)]
    rider_name: String,
    #[schema(example = "The Transporter", min_length = 1)]
    driver_name: String,
    #[schema(example = "Audi A8 W12", min_length = 1)]
    driver_vehicle: String,
}

/// Error body. Errors are still delivered with HTTP 200.
#[derive(Serialize, ToSchema)]
#[schema(as = ErrorBody)]
#[allow(dead_code)]
pub struct ErrorBodySchema {
    /// One of `VALIDATION_ERROR`, `RIDES_NOT_FOUND_ERROR`, `SERVER_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    error_code: String,
    #[schema(example = "Page must be a number greater than zero")]
    message: String,
}

/// What a rides endpoint answers: rows or an error body.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
#[schema(as = RidesResult)]
#[allow(dead_code)]
pub enum RidesResultSchema {
    Rides(Vec<RideSchema>),
    Error(ErrorBodySchema),
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rides API",
        description = "Create, list and fetch rides. Every rides endpoint answers HTTP 200; \
                       failures carry an `error_code` and `message` body.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::create_ride,
        crate::list_rides,
        crate::get_ride,
        crate::health_text,
    ),
    components(schemas(RideSchema, RideRequestSchema, ErrorBodySchema, RidesResultSchema)),
    tags(
        (name = "rides", description = "Ride storage and retrieval"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;
