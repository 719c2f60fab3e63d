//! Request normalization driven by declarative field schemas.
//!
//! A schema is an ordered table of `(wire name, rule)` pairs. Normalizing
//! walks the table front to back and stops at the first failing field, so
//! the order of [`RIDE_SCHEMA`] and [`PAGE_SCHEMA`] *is* the order in which
//! errors are reported. Failures are never aggregated.

use serde_json::Value;

use crate::catalog::ValidationError;
use crate::ride::{NewRide, PageQuery, RideId, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::validation::{self, Axis, Endpoint, PageField, TextField};

/// One entry of a field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule<R> {
    /// Field name as it appears on the wire.
    pub wire_name: &'static str,
    pub rule: R,
}

/// Rules applied to the fields of a ride creation body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideRule {
    Coordinate(CoordinateField),
    Text(TextField),
}

/// The four coordinates of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateField {
    StartLat,
    StartLong,
    EndLat,
    EndLong,
}

impl CoordinateField {
    pub const fn axis(self) -> Axis {
        match self {
            CoordinateField::StartLat | CoordinateField::EndLat => Axis::Latitude,
            CoordinateField::StartLong | CoordinateField::EndLong => Axis::Longitude,
        }
    }

    pub const fn endpoint(self) -> Endpoint {
        match self {
            CoordinateField::StartLat | CoordinateField::StartLong => Endpoint::Start,
            CoordinateField::EndLat | CoordinateField::EndLong => Endpoint::End,
        }
    }
}

/// Field order for ride creation.
pub const RIDE_SCHEMA: [FieldRule<RideRule>; 7] = [
    FieldRule {
        wire_name: "start_lat",
        rule: RideRule::Coordinate(CoordinateField::StartLat),
    },
    FieldRule {
        wire_name: "start_long",
        rule: RideRule::Coordinate(CoordinateField::StartLong),
    },
    FieldRule {
        wire_name: "end_lat",
        rule: RideRule::Coordinate(CoordinateField::EndLat),
    },
    FieldRule {
        wire_name: "end_long",
        rule: RideRule::Coordinate(CoordinateField::EndLong),
    },
    FieldRule {
        wire_name: "rider_name",
        rule: RideRule::Text(TextField::RiderName),
    },
    FieldRule {
        wire_name: "driver_name",
        rule: RideRule::Text(TextField::DriverName),
    },
    FieldRule {
        wire_name: "driver_vehicle",
        rule: RideRule::Text(TextField::DriverVehicle),
    },
];

/// Field order for list queries, with the default used when a field is
/// omitted.
pub const PAGE_SCHEMA: [FieldRule<(PageField, i64)>; 2] = [
    FieldRule {
        wire_name: "page",
        rule: (PageField::Page, DEFAULT_PAGE),
    },
    FieldRule {
        wire_name: "limit",
        rule: (PageField::Limit, DEFAULT_LIMIT),
    },
];

#[derive(Debug, Default)]
struct RideDraft {
    start_lat: Option<f64>,
    start_long: Option<f64>,
    end_lat: Option<f64>,
    end_long: Option<f64>,
    rider_name: Option<String>,
    driver_name: Option<String>,
    driver_vehicle: Option<String>,
}

impl RideDraft {
    fn set_coordinate(&mut self, field: CoordinateField, value: f64) {
        let slot = match field {
            CoordinateField::StartLat => &mut self.start_lat,
            CoordinateField::StartLong => &mut self.start_long,
            CoordinateField::EndLat => &mut self.end_lat,
            CoordinateField::EndLong => &mut self.end_long,
        };
        *slot = Some(value);
    }

    fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::RiderName => &mut self.rider_name,
            TextField::DriverName => &mut self.driver_name,
            TextField::DriverVehicle => &mut self.driver_vehicle,
        };
        *slot = Some(value);
    }

    fn finish(self) -> Option<NewRide> {
        Some(NewRide {
            start_lat: self.start_lat?,
            start_long: self.start_long?,
            end_lat: self.end_lat?,
            end_long: self.end_long?,
            rider_name: self.rider_name?,
            driver_name: self.driver_name?,
            driver_vehicle: self.driver_vehicle?,
        })
    }
}

/// Normalize a ride creation body.
///
/// Bodies that are not JSON objects are treated as having every field
/// missing, so they fail on the first schema entry.
pub fn normalize_ride_request(body: &Value) -> Result<NewRide, ValidationError> {
    let mut draft = RideDraft::default();

    for field in &RIDE_SCHEMA {
        let value = body.get(field.wire_name);
        match field.rule {
            RideRule::Coordinate(coordinate) => {
                let parsed = validation::coordinate(value, coordinate.axis(), coordinate.endpoint())?;
                draft.set_coordinate(coordinate, parsed);
            }
            RideRule::Text(text) => {
                let parsed = validation::non_empty_string(value, text)?;
                draft.set_text(text, parsed);
            }
        }
    }

    // RIDE_SCHEMA covers every field, so an incomplete draft means the body
    // itself was unusable.
    draft.finish().ok_or(ValidationError::MalformedBody)
}

/// Normalize list-query parameters.
///
/// `params` holds the decoded query pairs in request order; when a key
/// repeats, its first occurrence is used.
pub fn normalize_page_query(params: &[(String, String)]) -> Result<PageQuery, ValidationError> {
    let mut query = PageQuery::default();

    for field in &PAGE_SCHEMA {
        let raw = params
            .iter()
            .find(|(key, _)| key == field.wire_name)
            .map(|(_, value)| value.as_str());
        let (page_field, default) = field.rule;
        let value = validation::positive_integer(raw, page_field, default)?;
        match page_field {
            PageField::Page => query.page = value,
            PageField::Limit => query.limit = value,
        }
    }

    Ok(query)
}

/// Normalize a ride identifier taken from the request path.
pub fn normalize_ride_id(raw: &str) -> Result<RideId, ValidationError> {
    validation::ride_id(raw)
}
