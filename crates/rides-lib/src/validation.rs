//! Field validators.
//!
//! Each validator takes one raw value and returns either the coerced typed
//! value or the catalog [`ValidationError`] for that field. None of them
//! touch storage; the ride-ID validator in particular hands back a parsed
//! integer so raw path text never reaches a query.

use serde_json::Value;

use crate::catalog::ValidationError;
use crate::ride::RideId;

/// Which coordinate of a pair is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest absolute value allowed on this axis.
    pub const fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

/// Which end of the ride a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub const fn error(self) -> ValidationError {
        match self {
            Endpoint::Start => ValidationError::StartCoordinate,
            Endpoint::End => ValidationError::EndCoordinate,
        }
    }
}

/// Required free-text fields of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    RiderName,
    DriverName,
    DriverVehicle,
}

impl TextField {
    pub const fn error(self) -> ValidationError {
        match self {
            TextField::RiderName => ValidationError::RiderName,
            TextField::DriverName => ValidationError::DriverName,
            TextField::DriverVehicle => ValidationError::DriverVehicle,
        }
    }
}

/// Pagination parameters of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageField {
    Page,
    Limit,
}

impl PageField {
    pub const fn error(self) -> ValidationError {
        match self {
            PageField::Page => ValidationError::Page,
            PageField::Limit => ValidationError::Limit,
        }
    }
}

/// Validate a latitude or longitude.
///
/// JSON numbers are taken as-is and numeric strings are parsed. Anything
/// else, including a missing value, fails with the endpoint's message.
pub fn coordinate(
    value: Option<&Value>,
    axis: Axis,
    endpoint: Endpoint,
) -> Result<f64, ValidationError> {
    value
        .and_then(coerce_number)
        .filter(|number| number.is_finite() && number.abs() <= axis.limit())
        .ok_or(endpoint.error())
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Validate a required, non-empty string.
pub fn non_empty_string(value: Option<&Value>, field: TextField) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        _ => Err(field.error()),
    }
}

/// Validate an optional positive integer, falling back to `default` when
/// the parameter is absent or blank.
pub fn positive_integer(
    value: Option<&str>,
    field: PageField,
    default: i64,
) -> Result<i64, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => parse_positive(raw).ok_or(field.error()),
    }
}

/// Validate a ride identifier taken from a request path.
pub fn ride_id(raw: &str) -> Result<RideId, ValidationError> {
    parse_positive(raw.trim())
        .and_then(RideId::new)
        .ok_or(ValidationError::RideId)
}

/// Parse a whole number of at least one.
///
/// Integral decimal and exponent forms such as `2.0` or `1e1` count as whole
/// numbers. Plain integer text is parsed exactly so the full `i64` range
/// survives.
fn parse_positive(raw: &str) -> Option<i64> {
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => whole_number(raw)?,
    };
    (value >= 1).then_some(value)
}

fn whole_number(raw: &str) -> Option<i64> {
    // 2^63 is the first float past `i64::MAX`.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < UPPER).then_some(value as i64)
}
