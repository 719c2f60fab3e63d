//! Service layer: runs validated requests against a [`RideStore`] and turns
//! empty results and storage faults into catalog errors.

use tracing::{error, info};

use crate::catalog::RideError;
use crate::db::RideStore;
use crate::error::Error;
use crate::ride::{NewRide, PageQuery, Ride, RideId};

/// Ride operations over an injected store.
///
/// The store is handed in once at construction and never replaced.
#[derive(Debug, Clone)]
pub struct RideService<S> {
    store: S,
}

impl<S: RideStore> RideService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a ride and return it as stored, as a single-element list.
    ///
    /// The row is read back by the identifier storage assigned so the
    /// response carries `rideID` and `created`.
    pub fn create_ride(&self, ride: &NewRide) -> Result<Vec<Ride>, RideError> {
        let ride_id = self.store.insert(ride).map_err(storage_fault("insert"))?;
        let rides = self
            .store
            .select_by_id(ride_id)
            .map_err(storage_fault("select_by_id"))?;

        if rides.is_empty() {
            return Err(storage_fault("select_by_id")(Error::MissingInsertedRide {
                ride_id: ride_id.get(),
            }));
        }

        info!(ride_id = %ride_id, "ride created");
        Ok(rides)
    }

    /// Return one page of rides ordered by identifier.
    pub fn list_rides(&self, query: PageQuery) -> Result<Vec<Ride>, RideError> {
        let rides = self
            .store
            .select_page(query.limit, query.offset())
            .map_err(storage_fault("select_page"))?;

        if rides.is_empty() {
            return Err(RideError::RidesNotFound);
        }
        Ok(rides)
    }

    /// Return the ride with the given identifier as a single-element list.
    pub fn get_ride_by_id(&self, ride_id: RideId) -> Result<Vec<Ride>, RideError> {
        let rides = self
            .store
            .select_by_id(ride_id)
            .map_err(storage_fault("select_by_id"))?;

        if rides.is_empty() {
            return Err(RideError::RidesNotFound);
        }
        Ok(rides)
    }
}

/// Log a storage fault with full detail and wrap it as a server error.
fn storage_fault(operation: &'static str) -> impl FnOnce(Error) -> RideError {
    move |fault| {
        error!(operation, error = %fault, "storage operation failed");
        RideError::Server(fault)
    }
}
