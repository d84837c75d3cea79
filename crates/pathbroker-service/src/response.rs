//! Response bodies for the broker endpoints.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use pathbroker_lib::{BrokerReply, Gazetteer, RouteResult};

/// Successful payload with content type metadata, mirroring `ProblemDetails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Flattened view of a [`BrokerReply`].
///
/// Metric fields are present only for structured successes; `error` only for
/// failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub success: bool,
    pub summary: String,
    pub map_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure classification (`timeout`, `process_exit`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<BrokerReply> for RouteResponse {
    fn from(reply: BrokerReply) -> Self {
        let BrokerReply {
            result,
            summary,
            map_link,
        } = reply;

        match result {
            RouteResult::Success(success) => Self {
                success: true,
                summary,
                map_link,
                format: Some(success.format.label().to_string()),
                algorithm: success.algorithm,
                distance: success.distance,
                time: success.time,
                steps: success.steps,
                path: success.path,
                error: None,
                reason: None,
            },
            RouteResult::Failure(failure) => Self {
                success: false,
                summary,
                map_link: None,
                format: None,
                algorithm: None,
                distance: None,
                time: None,
                steps: None,
                path: Vec::new(),
                error: Some(failure.message),
                reason: Some(failure.kind.label().to_string()),
            },
        }
    }
}

/// One gazetteer entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Body of `GET /api/v1/locations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationEntry>,
}

impl From<&Gazetteer> for LocationsResponse {
    fn from(gazetteer: &Gazetteer) -> Self {
        let locations = gazetteer
            .entries()
            .into_iter()
            .map(|(name, coord)| LocationEntry {
                name: name.to_string(),
                lat: coord.lat,
                lon: coord.lon,
            })
            .collect();
        Self { locations }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pathbroker_lib::{BrokerConfig, PathBroker, RawProcessOutput};

    use super::*;

    fn broker() -> PathBroker {
        PathBroker::new(&BrokerConfig::default(), Arc::new(Gazetteer::campus().clone()))
    }

    #[test]
    fn structured_success_carries_metrics() {
        let reply = broker().interpret(&RawProcessOutput::new(
            0,
            r#"{"success":true,"algorithm":"astar","distance":200,"time":3,"steps":2,"path":"oat -> hostel"}"#,
        ));
        let response = RouteResponse::from(reply);

        assert!(response.success);
        assert_eq!(response.format.as_deref(), Some("structured"));
        assert_eq!(response.algorithm.as_deref(), Some("astar"));
        assert_eq!(response.steps, Some(2));
        assert_eq!(response.path, vec!["oat", "hostel"]);
        assert!(response.map_link.is_some());
    }

    #[test]
    fn failure_omits_metrics_and_link() {
        let response = RouteResponse::from(broker().interpret(&RawProcessOutput::new(3, "")));
        let json = serde_json::to_value(ServiceResponse::new(response)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "computation exited with status 3");
        assert_eq!(json["reason"], "process_exit");
        assert!(json["map_link"].is_null());
        assert!(json.get("distance").is_none());
        assert_eq!(json["content_type"], "application/json");
    }

    #[test]
    fn locations_are_sorted() {
        let response = LocationsResponse::from(Gazetteer::campus());
        assert_eq!(response.locations.len(), 15);
        assert_eq!(response.locations[0].name, "academic block a");
    }
}
