use thiserror::Error;

/// Convenient result alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage-level error type.
///
/// These never reach a client verbatim; the service layer logs them and
/// reports [`crate::RideError::Server`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection lock.
    #[error("database connection lock was poisoned")]
    LockPoisoned,

    /// The row returned by an insert could not be read back.
    #[error("ride {ride_id} could not be read back after insertion")]
    MissingInsertedRide { ride_id: i64 },

    /// Storage assigned an identifier outside the positive range.
    #[error("storage assigned invalid ride identifier {value}")]
    InvalidAssignedId { value: i64 },

    /// The blocking task running a storage call did not complete.
    #[error("storage task did not complete: {message}")]
    TaskFailed { message: String },
}
