use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ride::{NewRide, Ride, RideId};

/// Schema for the single `Rides` table.
pub const RIDES_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Rides (
    rideID INTEGER PRIMARY KEY AUTOINCREMENT,
    startLat DECIMAL NOT NULL,
    startLong DECIMAL NOT NULL,
    endLat DECIMAL NOT NULL,
    endLong DECIMAL NOT NULL,
    riderName TEXT NOT NULL,
    driverName TEXT NOT NULL,
    driverVehicle TEXT NOT NULL,
    created DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

const RIDE_COLUMNS: &str =
    "rideID, startLat, startLong, endLat, endLong, riderName, driverName, driverVehicle, created";

/// Storage operations the service layer relies on.
///
/// Every query is parameterized; implementations must never splice caller
/// input into SQL text.
pub trait RideStore: Send + Sync {
    /// Insert a ride and return the identifier storage assigned to it.
    fn insert(&self, ride: &NewRide) -> Result<RideId>;

    /// Fetch the rides whose identifier matches `id` (zero or one row).
    fn select_by_id(&self, id: RideId) -> Result<Vec<Ride>>;

    /// Fetch up to `limit` rides ordered by identifier, skipping `offset`.
    fn select_page(&self, limit: i64, offset: i64) -> Result<Vec<Ride>>;

    /// Check that storage can answer queries at all.
    fn ping(&self) -> Result<()> {
        self.select_page(1, 0).map(|_| ())
    }
}

impl<T: RideStore + ?Sized> RideStore for Arc<T> {
    fn insert(&self, ride: &NewRide) -> Result<RideId> {
        (**self).insert(ride)
    }

    fn select_by_id(&self, id: RideId) -> Result<Vec<Ride>> {
        (**self).select_by_id(id)
    }

    fn select_page(&self, limit: i64, offset: i64) -> Result<Vec<Ride>> {
        (**self).select_page(limit, offset)
    }

    fn ping(&self) -> Result<()> {
        (**self).ping()
    }
}

/// SQLite-backed [`RideStore`].
///
/// SQLite serializes writes itself; the mutex only guards the single
/// `Connection`, which is not `Sync`.
#[derive(Debug)]
pub struct SqliteRideStore {
    connection: Mutex<Connection>,
}

impl SqliteRideStore {
    /// Open (or create) the database at `path` and bootstrap the schema.
    ///
    /// The special path `:memory:` opens a private in-memory database.
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening ride database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database with the schema in place.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, bootstrapping the schema on it.
    pub fn from_connection(connection: Connection) -> Result<Self> {
        bootstrap_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Run `f` against the underlying connection.
    ///
    /// Intended for probes, seeding and maintenance; request handling goes
    /// through [`RideStore`].
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let connection = self.lock()?;
        Ok(f(&connection)?)
    }

    /// Number of rides currently stored.
    pub fn count(&self) -> Result<i64> {
        self.with_connection(|connection| {
            connection.query_row("SELECT COUNT(*) FROM Rides", [], |row| row.get(0))
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection.lock().map_err(|_| Error::LockPoisoned)
    }
}

impl RideStore for SqliteRideStore {
    fn insert(&self, ride: &NewRide) -> Result<RideId> {
        let connection = self.lock()?;
        connection.execute(
            "INSERT INTO Rides(startLat, startLong, endLat, endLong, riderName, driverName, driverVehicle) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ride.start_lat,
                ride.start_long,
                ride.end_lat,
                ride.end_long,
                ride.rider_name,
                ride.driver_name,
                ride.driver_vehicle,
            ],
        )?;

        let value = connection.last_insert_rowid();
        RideId::new(value).ok_or(Error::InvalidAssignedId { value })
    }

    fn select_by_id(&self, id: RideId) -> Result<Vec<Ride>> {
        let connection = self.lock()?;
        let sql = format!("SELECT {RIDE_COLUMNS} FROM Rides WHERE rideID = ?1");
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map([id.get()], row_to_ride)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn select_page(&self, limit: i64, offset: i64) -> Result<Vec<Ride>> {
        let connection = self.lock()?;
        let sql = format!("SELECT {RIDE_COLUMNS} FROM Rides ORDER BY rideID ASC LIMIT ?1 OFFSET ?2");
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map([limit, offset], row_to_ride)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn ping(&self) -> Result<()> {
        self.with_connection(|connection| {
            connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        })?;
        Ok(())
    }
}

/// Create the `Rides` table if it does not exist yet.
pub fn bootstrap_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(RIDES_SCHEMA)?;
    Ok(())
}

fn row_to_ride(row: &Row<'_>) -> rusqlite::Result<Ride> {
    let raw_id: i64 = row.get("rideID")?;
    let ride_id = RideId::new(raw_id).ok_or(rusqlite::Error::IntegralValueOutOfRange(0, raw_id))?;

    Ok(Ride {
        ride_id,
        start_lat: row.get("startLat")?,
        start_long: row.get("startLong")?,
        end_lat: row.get("endLat")?,
        end_long: row.get("endLong")?,
        rider_name: row.get("riderName")?,
        driver_name: row.get("driverName")?,
        driver_vehicle: row.get("driverVehicle")?,
        created: row.get::<_, Option<String>>("created")?.unwrap_or_default(),
    })
}
