//! HTTP service for the campus path broker.
//!
//! Exposes the broker as JSON endpoints with health probes, Prometheus
//! metrics and structured logging. Handlers live in [`routes`]; [`router`]
//! assembles them over an [`AppState`].

pub mod health;
pub mod logging;
pub mod metrics;
pub mod problem;
pub mod request;
pub mod response;
pub mod routes;
pub mod state;

pub use health::{health_live, health_ready, HealthStatus, SERVICE_NAME};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_route_computed, record_route_failed,
    record_route_waypoints, MetricsConfig, MetricsError,
};
pub use problem::{
    ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_SERVICE_UNAVAILABLE,
};
pub use request::{RequestId, RouteRequest, Validate, REQUEST_ID_HEADER};
pub use response::{LocationEntry, LocationsResponse, RouteResponse, ServiceResponse};
pub use routes::{panic_response, router};
pub use state::AppState;
