//! Prometheus metrics for the rides service.
//!
//! The recorder is process-global: call [`init_metrics`] once at startup and
//! serve [`metrics_handler`] on the configured path. Until then every
//! `record_*` helper is a no-op.
//!
//! # Business metrics
//!
//! | name                          | kind      | labels       |
//! |-------------------------------|-----------|--------------|
//! | `rides_created_total`         | counter   |              |
//! | `rides_returned`              | histogram | `endpoint`   |
//! | `rides_request_failed_total`  | counter   | `error_code` |
//!
//! # Example
//!
//! ```no_run
//! use rides_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

const DEFAULT_PATH: &str = "/metrics";

/// Route prefixes owned by the service itself.
const RESERVED_PREFIXES: [&str; 4] = ["/rides", "/health", "/documentation", "/api-docs"];

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the exposition text.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from `METRICS_ENABLED` and `METRICS_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let path = match lookup("METRICS_PATH") {
            Some(path) if is_free_path(&path) => path,
            Some(path) => {
                tracing::warn!(path = %path, fallback = DEFAULT_PATH, "unusable METRICS_PATH");
                DEFAULT_PATH.to_string()
            }
            None => DEFAULT_PATH.to_string(),
        };

        Self { enabled, path }
    }
}

/// A metrics path must be absolute, literal and clear of the service routes.
fn is_free_path(path: &str) -> bool {
    let literal = path.len() > 1
        && path.starts_with('/')
        && !path.contains(['{', '}', '*', '?', '#'])
        && !path.contains("//");
    let reserved = RESERVED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });
    literal && !reserved
}

/// Install the Prometheus recorder.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed or
/// when the exporter cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Render the exposition text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Count a ride persisted through `POST /rides`.
pub fn record_ride_created() {
    metrics::counter!("rides_created_total").increment(1);
}

/// Record how many rides an endpoint returned.
///
/// * `endpoint` - `list` or `get`
pub fn record_rides_returned(count: usize, endpoint: &'static str) {
    metrics::histogram!("rides_returned", "endpoint" => endpoint).record(count as f64);
}

/// Count a request answered with an error body, labelled by wire code.
pub fn record_request_failed(error_code: &'static str) {
    metrics::counter!("rides_request_failed_total", "error_code" => error_code).increment(1);
}
