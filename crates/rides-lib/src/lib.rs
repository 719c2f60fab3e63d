//! Rides library entry points.
//!
//! This crate holds everything between the HTTP boundary and SQLite: the
//! error catalog, field validators, the request normalizer, the ride store
//! and the service layer that ties them together. HTTP crates should only
//! depend on the items exported here instead of reimplementing validation or
//! error mapping.
//!
//! ```text
//! raw request ──► normalize ──► RideService ──► RideStore (SQLite)
//!                    │               │
//!                    └──► RideError ◄┘
//! ```

pub mod catalog;
pub mod db;
pub mod error;
pub mod normalize;
pub mod ride;
pub mod service;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use catalog::{ErrorKind, RideError, ValidationError};
pub use db::{bootstrap_schema, RideStore, SqliteRideStore};
pub use error::{Error, Result};
pub use normalize::{normalize_page_query, normalize_ride_id, normalize_ride_request};
pub use ride::{NewRide, PageQuery, Ride, RideId};
pub use service::RideService;
