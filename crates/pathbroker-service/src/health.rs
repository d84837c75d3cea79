//! Health check handlers for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub const SERVICE_NAME: &str = "pathbroker";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations_loaded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    /// Subprocess permits free at the time of the probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_permits: Option<usize>,
}

impl HealthStatus {
    pub fn alive() -> Self {
        Self {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            locations_loaded: None,
            max_concurrency: None,
            available_permits: None,
        }
    }

    fn with_capacity(mut self, state: &AppState) -> Self {
        let broker = state.broker();
        self.locations_loaded = Some(broker.gazetteer().len());
        self.max_concurrency = Some(broker.orchestrator().max_concurrent());
        self.available_permits = Some(broker.orchestrator().available_permits());
        self
    }
}

/// `GET /health/live`: 200 while the process is running.
pub async fn health_live() -> impl IntoResponse {
    Json(HealthStatus::alive())
}

/// `GET /health/ready`: 200 when locations are loaded, 503 otherwise.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let status = HealthStatus::alive().with_capacity(&state);

    if state.broker().gazetteer().is_empty() {
        let status = HealthStatus {
            status: "not_ready: no locations loaded".to_string(),
            ..status
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    (StatusCode::OK, Json(status)).into_response()
}
