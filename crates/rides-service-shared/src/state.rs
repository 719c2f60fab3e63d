//! Application state for the rides HTTP service.
//!
//! Handlers reach the [`RideService`] through this state. The store is
//! chosen once, when the state is built, and never swapped afterwards.

use std::sync::Arc;

use rides_lib::{Error as LibError, RideError, RideService, RideStore, SqliteRideStore};

use crate::config::ServiceConfig;

/// Store type shared by every handler.
pub type DynRideStore = Arc<dyn RideStore>;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open or bootstrap the ride database.
    DatabaseOpen(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseOpen(e) => write!(f, "failed to open ride database: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DatabaseOpen(e) => Some(e),
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::DatabaseOpen(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone; share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use rides_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let rides = state.run(|service| service.list_rides(Default::default())).await;
/// }
///
/// let state = AppState::load(&ServiceConfig::from_env()).unwrap();
/// let app = Router::new().route("/rides", get(handler)).with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: RideService<DynRideStore>,
}

impl AppState {
    /// Open the configured SQLite database and build the state around it.
    pub fn load(config: &ServiceConfig) -> Result<Self, AppStateError> {
        tracing::info!(path = %config.database_path.display(), "opening ride database");
        let store = SqliteRideStore::open(&config.database_path)?;

        if config.is_in_memory() {
            tracing::warn!("ride database is in memory; rides are lost on restart");
        }

        Ok(Self::new(Arc::new(store)))
    }

    /// Build state around an already constructed store.
    pub fn new(store: DynRideStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                service: RideService::new(store),
            }),
        }
    }

    pub fn service(&self) -> &RideService<DynRideStore> {
        &self.inner.service
    }

    /// Run a service operation on the blocking thread pool.
    ///
    /// SQLite calls block, so they never run on the async executor. A task
    /// that panics or is cancelled surfaces as a server error.
    pub async fn run<T, F>(&self, op: F) -> Result<T, RideError>
    where
        T: Send + 'static,
        F: FnOnce(&RideService<DynRideStore>) -> Result<T, RideError> + Send + 'static,
    {
        let state = self.clone();
        match tokio::task::spawn_blocking(move || op(state.service())).await {
            Ok(result) => result,
            Err(join_error) => {
                tracing::error!(error = %join_error, "blocking ride task failed");
                Err(RideError::Server(LibError::TaskFailed {
                    message: join_error.to_string(),
                }))
            }
        }
    }

    /// Whether the store currently answers queries.
    pub async fn is_ready(&self) -> bool {
        let state = self.clone();
        let outcome =
            tokio::task::spawn_blocking(move || state.service().store().ping()).await;
        match outcome {
            Ok(Ok(())) => true,
            Ok(Err(fault)) => {
                tracing::warn!(error = %fault, "ride store is not ready");
                false
            }
            Err(join_error) => {
                tracing::warn!(error = %join_error, "readiness probe task failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded_state, test_state, FailingStore};
    use rides_lib::{ErrorKind, PageQuery};

    #[tokio::test]
    async fn test_run_executes_on_blocking_pool() {
        let state = seeded_state();
        let rides = state
            .run(|service| service.list_rides(PageQuery::default()))
            .await
            .unwrap();
        assert_eq!(rides.len(), 5);
    }

    #[tokio::test]
    async fn test_run_maps_panics_to_server_error() {
        let state = test_state();
        let result: Result<(), RideError> = state.run(|_| panic!("boom")).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_is_ready_tracks_store_health() {
        assert!(test_state().is_ready().await);
        assert!(!AppState::new(Arc::new(FailingStore)).is_ready().await);
    }

    #[test]
    fn test_app_state_clone_shares_service() {
        let state1 = test_state();
        let state2 = state1.clone();
        assert!(std::ptr::eq(state1.service(), state2.service()));
    }

    #[test]
    fn test_app_state_load_in_memory() {
        let state = AppState::load(&ServiceConfig::default()).unwrap();
        assert!(format!("{:?}", state).contains("AppState"));
    }

    #[test]
    fn test_app_state_load_unopenable_path() {
        let config = ServiceConfig {
            database_path: "/nonexistent/dir/rides.db".into(),
            ..ServiceConfig::default()
        };
        let err = AppState::load(&config).unwrap_err();
        assert!(err.to_string().contains("failed to open ride database"));
    }
}
