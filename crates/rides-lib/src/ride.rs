use std::fmt;

use serde::{Deserialize, Serialize};

/// Page used when a list query omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when a list query omits `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Storage-assigned ride identifier. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RideId(i64);

impl RideId {
    /// Wrap a raw identifier, rejecting zero and negative values.
    pub const fn new(value: i64) -> Option<Self> {
        if value >= 1 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RideId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("ride identifier must be positive, got {value}"))
    }
}

impl From<RideId> for i64 {
    fn from(id: RideId) -> Self {
        id.0
    }
}

/// A persisted ride as stored and returned on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    #[serde(rename = "rideID")]
    pub ride_id: RideId,
    pub start_lat: f64,
    pub start_long: f64,
    pub end_lat: f64,
    pub end_long: f64,
    pub rider_name: String,
    pub driver_name: String,
    pub driver_vehicle: String,
    /// Insertion timestamp assigned by storage (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created: String,
}

/// A validated ride creation request.
///
/// Produced only by [`crate::normalize_ride_request`], so every field
/// already satisfies the coordinate and non-empty constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRide {
    pub start_lat: f64,
    pub start_long: f64,
    pub end_lat: f64,
    pub end_long: f64,
    pub rider_name: String,
    pub driver_name: String,
    pub driver_vehicle: String,
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: i64,
    pub limit: i64,
}

impl PageQuery {
    /// Number of rows skipped before this page: `(page - 1) * limit`.
    ///
    /// Saturates instead of overflowing; a saturated offset simply selects
    /// an empty page.
    pub const fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ride() -> Ride {
        Ride {
            ride_id: RideId::new(1).unwrap(),
            start_lat: 48.858222,
            start_long: 2.2945,
            end_lat: 48.861111,
            end_long: 2.335833,
            rider_name: "Dominic Toretto".to_string(),
            driver_name: "The Transporter".to_string(),
            driver_vehicle: "Audi A8 W12".to_string(),
            created: "2021-09-18 23:38:06".to_string(),
        }
    }

    #[test]
    fn ride_id_rejects_non_positive() {
        assert!(RideId::new(0).is_none());
        assert!(RideId::new(-4).is_none());
        assert_eq!(RideId::new(7).map(RideId::get), Some(7));
    }

    #[test]
    fn ride_serializes_with_wire_names() {
        let json = serde_json::to_value(sample_ride()).unwrap();

        assert_eq!(json["rideID"], 1);
        assert_eq!(json["startLat"], 48.858222);
        assert_eq!(json["startLong"], 2.2945);
        assert_eq!(json["endLat"], 48.861111);
        assert_eq!(json["endLong"], 2.335833);
        assert_eq!(json["riderName"], "Dominic Toretto");
        assert_eq!(json["driverName"], "The Transporter");
        assert_eq!(json["driverVehicle"], "Audi A8 W12");
        assert_eq!(json["created"], "2021-09-18 23:38:06");
        assert!(json.get("ride_id").is_none());
    }

    #[test]
    fn ride_deserialization_rejects_zero_id() {
        let mut json = serde_json::to_value(sample_ride()).unwrap();
        json["rideID"] = serde_json::json!(0);

        assert!(serde_json::from_value::<Ride>(json).is_err());
    }

    #[test]
    fn page_offset_follows_formula() {
        assert_eq!(PageQuery::default().offset(), 0);
        assert_eq!(PageQuery { page: 2, limit: 2 }.offset(), 2);
        assert_eq!(PageQuery { page: 3, limit: 10 }.offset(), 20);
    }

    #[test]
    fn page_offset_saturates() {
        let query = PageQuery {
            page: i64::MAX,
            limit: i64::MAX,
        };
        assert_eq!(query.offset(), i64::MAX);
    }
}
