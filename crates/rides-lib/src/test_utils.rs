//! Fixtures and store doubles shared by the rides test suites.
//!
//! Compiled for this crate's own tests and, through the `test-utils`
//! feature, for downstream crates.

use rusqlite::{ffi, params};

use crate::db::{RideStore, SqliteRideStore};
use crate::error::{Error, Result};
use crate::ride::{NewRide, Ride, RideId};

/// Storage detail carried by injected faults; must never reach a client.
pub const FAULT_DETAIL: &str = "unable to open database file: /var/lib/rides/rides.db";

/// Timestamp stamped on every fixture ride.
pub const FIXTURE_CREATED: &str = "2021-09-18 23:43:53";

/// Five rides with identifiers 1 through 5.
pub fn ride_fixtures() -> Vec<Ride> {
    let rows = [
        (1, 48.858222, 2.2945, 48.861111, 2.335833, "Dominic Toretto", "The Transporter", "Audi A8 W12"),
        (2, 1.858222, 1.2945, 3.861111, 3.335833, "M", "James Bond", "Aston Martin DB5"),
        (3, 0.858222, 0.2945, 3.861111, 3.335833, "Donda", "College Dropout", "Mercedes"),
        (4, 9.858222, 3.2945, 3.861111, 3.335833, "Tom Ford", "Henry Ford", "Ford"),
        (5, 22.858222, 56.2945, 3.861111, 3.335833, "Kevin Snow", "Chris James", "Honda Accord"),
    ];

    rows.into_iter()
        .map(
            |(id, start_lat, start_long, end_lat, end_long, rider, driver, vehicle)| Ride {
                ride_id: RideId::new(id).expect("fixture ids are positive"),
                start_lat,
                start_long,
                end_lat,
                end_long,
                rider_name: rider.to_string(),
                driver_name: driver.to_string(),
                driver_vehicle: vehicle.to_string(),
                created: FIXTURE_CREATED.to_string(),
            },
        )
        .collect()
}

/// A valid, already-normalized creation request.
pub fn new_ride() -> NewRide {
    NewRide {
        start_lat: 48.858222,
        start_long: 2.2945,
        end_lat: 48.861111,
        end_long: 2.335833,
        rider_name: "Dominic Toretto".to_string(),
        driver_name: "The Transporter".to_string(),
        driver_vehicle: "Audi A8 W12".to_string(),
    }
}

/// Insert rides with their explicit identifiers and timestamps.
///
/// # Panics
///
/// Panics if a row cannot be inserted, e.g. on an identifier clash.
pub fn seed_rides(store: &SqliteRideStore, rides: &[Ride]) {
    store
        .with_connection(|connection| {
            for ride in rides {
                connection.execute(
                    "INSERT INTO Rides(rideID, startLat, startLong, endLat, endLong, riderName, driverName, driverVehicle, created) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        ride.ride_id.get(),
                        ride.start_lat,
                        ride.start_long,
                        ride.end_lat,
                        ride.end_long,
                        ride.rider_name,
                        ride.driver_name,
                        ride.driver_vehicle,
                        ride.created,
                    ],
                )?;
            }
            Ok(())
        })
        .unwrap_or_else(|e| panic!("failed to seed fixture rides: {}", e));
}

/// A SQLite `CANTOPEN` failure whose message is [`FAULT_DETAIL`].
pub fn storage_fault() -> Error {
    Error::Sqlite(rusqlite::Error::SqliteFailure(
        ffi::Error::new(ffi::SQLITE_CANTOPEN),
        Some(FAULT_DETAIL.to_string()),
    ))
}

/// Which store calls a [`FaultyStore`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Insert,
    Select,
}

/// Store that delegates to SQLite but fails the chosen operation.
#[derive(Debug)]
pub struct FaultyStore {
    pub inner: SqliteRideStore,
    pub fail_on: FailOn,
}

impl RideStore for FaultyStore {
    fn insert(&self, ride: &NewRide) -> Result<RideId> {
        if self.fail_on == FailOn::Insert {
            return Err(storage_fault());
        }
        self.inner.insert(ride)
    }

    fn select_by_id(&self, id: RideId) -> Result<Vec<Ride>> {
        if self.fail_on == FailOn::Select {
            return Err(storage_fault());
        }
        self.inner.select_by_id(id)
    }

    fn select_page(&self, limit: i64, offset: i64) -> Result<Vec<Ride>> {
        if self.fail_on == FailOn::Select {
            return Err(storage_fault());
        }
        self.inner.select_page(limit, offset)
    }
}

/// Store whose every operation fails with [`storage_fault`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl RideStore for FailingStore {
    fn insert(&self, _ride: &NewRide) -> Result<RideId> {
        Err(storage_fault())
    }

    fn select_by_id(&self, _id: RideId) -> Result<Vec<Ride>> {
        Err(storage_fault())
    }

    fn select_page(&self, _limit: i64, _offset: i64) -> Result<Vec<Ride>> {
        Err(storage_fault())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_fault_is_a_sqlite_error() {
        let fault = storage_fault();
        assert!(matches!(fault, Error::Sqlite(_)));
        assert_eq!(fault.to_string(), FAULT_DETAIL);
    }

    #[test]
    fn failing_store_fails_ping() {
        assert!(FailingStore.ping().is_err());
    }

    #[test]
    fn faulty_store_only_fails_chosen_operation() {
        let store = FaultyStore {
            inner: SqliteRideStore::open_in_memory().expect("open in-memory store"),
            fail_on: FailOn::Select,
        };
        assert!(store.insert(&new_ride()).is_ok());
        assert!(store.select_page(10, 0).is_err());
    }
}
