//! Test utilities for rides handler testing.
//!
//! Every state returned here wraps its own in-memory database, so tests
//! can create rides without seeing each other's rows.

use std::sync::Arc;

use rides_lib::SqliteRideStore;
use serde_json::{json, Value};

use crate::state::AppState;

pub use rides_lib::test_utils::{
    ride_fixtures, seed_rides, storage_fault, FailingStore, FAULT_DETAIL, FIXTURE_CREATED,
};

/// Wire body of a valid `POST /rides` request.
pub fn valid_ride_body() -> Value {
    json!({
        "start_lat": 48.858222,
        "start_long": 2.2945,
        "end_lat": 48.861111,
        "end_long": 2.335833,
        "rider_name": "Dominic Toretto",
        "driver_name": "The Transporter",
        "driver_vehicle": "Audi A8 W12"
    })
}

/// Fresh state over an empty in-memory database.
pub fn test_state() -> AppState {
    AppState::new(Arc::new(empty_store()))
}

/// Fresh state over an in-memory database holding [`ride_fixtures`].
pub fn seeded_state() -> AppState {
    let store = empty_store();
    seed_rides(&store, &ride_fixtures());
    AppState::new(Arc::new(store))
}

fn empty_store() -> SqliteRideStore {
    SqliteRideStore::open_in_memory()
        .unwrap_or_else(|e| panic!("failed to open in-memory ride store: {}", e))
}
