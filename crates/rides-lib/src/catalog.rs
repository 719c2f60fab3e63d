//! Fixed catalog of error codes and messages returned by the ride endpoints.
//!
//! Every failure a client can observe is one of three [`ErrorKind`]s. The
//! wire code and message for each kind never change, with the exception of
//! validation failures whose message names the offending field.

use thiserror::Error;

use crate::error::Error as StoreError;

/// Wire code for malformed client input.
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

/// Wire code for queries that matched no rides.
pub const RIDES_NOT_FOUND_CODE: &str = "RIDES_NOT_FOUND_ERROR";

/// Wire code for storage faults and anything unexpected.
pub const SERVER_ERROR_CODE: &str = "SERVER_ERROR";

/// Message for queries that matched no rides.
pub const RIDES_NOT_FOUND_MESSAGE: &str = "Could not find any rides";

/// Generic message for server-side faults.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Field-specific validation messages.
pub mod messages {
    pub const INVALID_START_COORDINATE: &str = "Start latitude and longitude must be between -90 - 90 and -180 to 180 degrees respectively";
    pub const INVALID_END_COORDINATE: &str = "End latitude and longitude must be between -90 - 90 and -180 to 180 degrees respectively";
    pub const INVALID_RIDER_NAME: &str = "Rider name must be a non empty string";
    pub const INVALID_DRIVER_NAME: &str = "Driver name must be a non empty string";
    pub const INVALID_DRIVER_VEHICLE: &str = "Driver vehicle must be a non empty string";
    pub const INVALID_PAGE: &str = "Page must be a number greater than zero";
    pub const INVALID_LIMIT: &str = "Limit must be a number greater than zero";
    pub const INVALID_RIDE_ID: &str = "Ride ID must be a number greater than zero";
    pub const MALFORMED_BODY: &str = "Request body must be a valid JSON object";
}

/// Symbolic error kinds exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    RidesNotFound,
    Server,
}

impl ErrorKind {
    /// The `error_code` string sent to clients.
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => VALIDATION_ERROR_CODE,
            ErrorKind::RidesNotFound => RIDES_NOT_FOUND_CODE,
            ErrorKind::Server => SERVER_ERROR_CODE,
        }
    }
}

/// A single failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    #[error("{}", messages::INVALID_START_COORDINATE)]
    StartCoordinate,
    #[error("{}", messages::INVALID_END_COORDINATE)]
    EndCoordinate,
    #[error("{}", messages::INVALID_RIDER_NAME)]
    RiderName,
    #[error("{}", messages::INVALID_DRIVER_NAME)]
    DriverName,
    #[error("{}", messages::INVALID_DRIVER_VEHICLE)]
    DriverVehicle,
    #[error("{}", messages::INVALID_PAGE)]
    Page,
    #[error("{}", messages::INVALID_LIMIT)]
    Limit,
    #[error("{}", messages::INVALID_RIDE_ID)]
    RideId,
    #[error("{}", messages::MALFORMED_BODY)]
    MalformedBody,
}

impl ValidationError {
    /// Message sent to the client for this failure.
    pub const fn message(self) -> &'static str {
        match self {
            ValidationError::StartCoordinate => messages::INVALID_START_COORDINATE,
            ValidationError::EndCoordinate => messages::INVALID_END_COORDINATE,
            ValidationError::RiderName => messages::INVALID_RIDER_NAME,
            ValidationError::DriverName => messages::INVALID_DRIVER_NAME,
            ValidationError::DriverVehicle => messages::INVALID_DRIVER_VEHICLE,
            ValidationError::Page => messages::INVALID_PAGE,
            ValidationError::Limit => messages::INVALID_LIMIT,
            ValidationError::RideId => messages::INVALID_RIDE_ID,
            ValidationError::MalformedBody => messages::MALFORMED_BODY,
        }
    }
}

/// Domain error produced by the normalizer and the service layer.
///
/// `Display` only ever yields catalog text. The storage fault behind
/// [`RideError::Server`] is reachable through `source()` for logging.
#[derive(Debug, Error)]
pub enum RideError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", RIDES_NOT_FOUND_MESSAGE)]
    RidesNotFound,

    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Server(#[source] StoreError),
}

impl RideError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RideError::Validation(_) => ErrorKind::Validation,
            RideError::RidesNotFound => ErrorKind::RidesNotFound,
            RideError::Server(_) => ErrorKind::Server,
        }
    }

    /// Wire `error_code` for this error.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Wire `message` for this error.
    pub fn message(&self) -> &'static str {
        match self {
            RideError::Validation(error) => error.message(),
            RideError::RidesNotFound => RIDES_NOT_FOUND_MESSAGE,
            RideError::Server(_) => UNKNOWN_ERROR_MESSAGE,
        }
    }
}
