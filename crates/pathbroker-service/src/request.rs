//! Request bodies, validation and request ids.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pathbroker_lib::PathQuery;

use crate::problem::ProblemDetails;

/// Header carrying the caller's correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request validation trait.
pub trait Validate {
    /// Returns a boxed problem describing the first invalid field.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Algorithm selector passed to the path finder verbatim.
    pub algorithm: String,
    pub from: String,
    pub to: String,
}

impl RouteRequest {
    pub fn to_query(&self) -> PathQuery {
        PathQuery::new(&self.algorithm, &self.from, &self.to)
    }
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        for (field, value) in [
            ("algorithm", &self.algorithm),
            ("from", &self.from),
            ("to", &self.to),
        ] {
            if value.trim().is_empty() {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("field '{}' must not be empty", field),
                    request_id,
                )));
            }
        }
        Ok(())
    }
}

/// Correlation id for one HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a time-sortable UUID v7 id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Use the `X-Request-ID` header when present and non-empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
