//! Request extractors for the rides endpoints.
//!
//! Each extractor runs the matching `rides-lib` normalizer on raw input and
//! rejects with a [`RidesResponse`] carrying the first failing field, so
//! handlers only ever see validated values.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde_json::Value;

use rides_lib::{
    normalize_page_query, normalize_ride_id, normalize_ride_request, NewRide, PageQuery, RideId,
    ValidationError,
};

use crate::RidesResponse;

/// Validated body of `POST /rides`.
#[derive(Debug, Clone)]
pub struct ValidRide(pub NewRide);

/// Validated `page` and `limit` of `GET /rides`.
#[derive(Debug, Clone, Copy)]
pub struct PageParams(pub PageQuery);

/// Validated `:id` segment of `GET /rides/:id`.
#[derive(Debug, Clone, Copy)]
pub struct ValidRideId(pub RideId);

/// Decode a request body into JSON.
///
/// An empty body decodes to `null`, which the normalizer treats as an object
/// with every field missing.
pub fn parse_body(bytes: &[u8]) -> Result<Value, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "request body is not valid JSON");
        ValidationError::MalformedBody
    })
}

impl<S> FromRequest<S> for ValidRide
where
    S: Send + Sync,
{
    type Rejection = RidesResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "failed to read request body");
            ValidationError::MalformedBody
        })?;

        let body = parse_body(&bytes)?;
        Ok(Self(normalize_ride_request(&body)?))
    }
}

impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = RidesResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // An undecodable query string is reported against the first field.
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::Page)?;

        Ok(Self(normalize_page_query(&pairs)?))
    }
}

impl<S> FromRequestParts<S> for ValidRideId
where
    S: Send + Sync,
{
    type Rejection = RidesResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::RideId)?;

        Ok(Self(normalize_ride_id(&raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    use crate::test_utils::valid_ride_body;

    fn post(body: impl Into<Body>) -> Request {
        Request::builder()
            .method("POST")
            .uri("/rides")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn rejection_code(response: RidesResponse) -> &'static str {
        match response {
            RidesResponse::Error(err) => err.code(),
            RidesResponse::Rides(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_parse_body_empty_is_null() {
        assert_eq!(parse_body(b""), Ok(Value::Null));
        assert_eq!(parse_body(b"  \n"), Ok(Value::Null));
    }

    #[test]
    fn test_parse_body_rejects_malformed() {
        assert_eq!(
            parse_body(b"{\"start_lat\": "),
            Err(ValidationError::MalformedBody)
        );
    }

    #[tokio::test]
    async fn test_valid_ride_extracts() {
        let body = valid_ride_body().to_string();
        let ValidRide(ride) = ValidRide::from_request(post(body), &()).await.unwrap();
        assert_eq!(ride.rider_name, "Dominic Toretto");
    }

    #[tokio::test]
    async fn test_valid_ride_rejects_invalid_field() {
        let mut body = valid_ride_body();
        body["driver_vehicle"] = json!("");
        let rejection = ValidRide::from_request(post(body.to_string()), &())
            .await
            .unwrap_err();
        assert_eq!(rejection_code(rejection), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_page_params_defaults_and_errors() {
        let (mut parts, _) = Request::builder()
            .uri("/rides")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let PageParams(query) = PageParams::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query, PageQuery { page: 1, limit: 10 });

        let (mut parts, _) = Request::builder()
            .uri("/rides?page=abc")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let rejection = PageParams::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(rejection_code(rejection), "VALIDATION_ERROR");
    }
}
