//! Response mapping for the rides endpoints.
//!
//! Every outcome, success or failure, is rendered with HTTP 200. Failures
//! carry an [`ErrorBody`] whose code and message come from the error
//! catalog in `rides-lib`, so storage detail never reaches the client.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use rides_lib::{Ride, RideError, ValidationError};

use crate::metrics::record_request_failed;

/// Wire shape of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}

impl From<&RideError> for ErrorBody {
    fn from(err: &RideError) -> Self {
        Self {
            error_code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }
}

/// Outcome of a rides endpoint.
///
/// # Example
///
/// ```
/// use rides_lib::ValidationError;
/// use rides_service_shared::RidesResponse;
///
/// let response = RidesResponse::from(ValidationError::Page);
/// assert!(response.is_error());
/// ```
#[derive(Debug)]
pub enum RidesResponse {
    /// Rows to return as a JSON array.
    Rides(Vec<Ride>),
    Error(RideError),
}

impl RidesResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<Vec<Ride>, RideError>> for RidesResponse {
    fn from(result: Result<Vec<Ride>, RideError>) -> Self {
        match result {
            Ok(rides) => Self::Rides(rides),
            Err(err) => Self::Error(err),
        }
    }
}

impl From<RideError> for RidesResponse {
    fn from(err: RideError) -> Self {
        Self::Error(err)
    }
}

impl From<ValidationError> for RidesResponse {
    fn from(err: ValidationError) -> Self {
        Self::Error(RideError::Validation(err))
    }
}

impl IntoResponse for RidesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Rides(rides) => Json(rides).into_response(),
            Self::Error(err) => {
                record_request_failed(err.code());
                tracing::debug!(error_code = err.code(), "request failed");
                Json(ErrorBody::from(&err)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::test_utils::{storage_fault, FAULT_DETAIL};

    #[test]
    fn test_error_body_from_validation() {
        let body = ErrorBody::from(&RideError::from(ValidationError::Limit));
        assert_eq!(body.error_code, "VALIDATION_ERROR");
        assert_eq!(body.message, "Limit must be a number greater than zero");
    }

    #[test]
    fn test_error_body_hides_server_detail() {
        let err = RideError::Server(storage_fault());
        let body = ErrorBody::from(&err);
        assert_eq!(body.error_code, "SERVER_ERROR");
        assert_eq!(body.message, "Unknown error");
        assert!(!body.message.contains(FAULT_DETAIL));
    }

    #[test]
    fn test_error_body_serialization() {
        let body = ErrorBody::from(&RideError::RidesNotFound);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error_code": "RIDES_NOT_FOUND_ERROR",
                "message": "Could not find any rides"
            })
        );
    }

    #[test]
    fn test_errors_render_with_ok_status() {
        let response = RidesResponse::from(RideError::RidesNotFound).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = RidesResponse::from(ValidationError::RideId).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_from_result() {
        assert!(!RidesResponse::from(Ok(Vec::new())).is_error());
        assert!(RidesResponse::from(Err(RideError::RidesNotFound)).is_error());
    }
}
