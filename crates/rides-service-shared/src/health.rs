//! Health check handlers.
//!
//! `GET /health` answers the plain text `Healthy` for existing callers.
//! `/health/live` and `/health/ready` return JSON for orchestrator probes;
//! readiness additionally pings the ride store.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of the JSON probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok` or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_ready: Option<bool>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            database_ready: None,
        }
    }

    pub fn ready(service: &str, version: &str) -> Self {
        Self {
            database_ready: Some(true),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            database_ready: Some(false),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health`: always the literal text `Healthy`.
pub async fn health() -> &'static str {
    "Healthy"
}

/// Liveness probe; does not touch the database.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe; 503 when the ride store cannot answer a query.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"rides-service-shared","version":"0.1.0","database_ready":true}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if !state.is_ready().await {
        let status = HealthStatus::not_ready(service, version, "database unavailable");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    (StatusCode::OK, Json(HealthStatus::ready(service, version))).into_response()
}
