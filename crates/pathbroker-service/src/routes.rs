//! Broker endpoints and router assembly.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use pathbroker_lib::{FailureKind, RouteResult};

use crate::health::{health_live, health_ready};
use crate::metrics::{
    metrics_handler, record_route_computed, record_route_failed, record_route_waypoints,
};
use crate::problem::ProblemDetails;
use crate::request::{RequestId, RouteRequest, Validate, REQUEST_ID_HEADER};
use crate::response::{LocationsResponse, RouteResponse, ServiceResponse};
use crate::AppState;

/// Build the service router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/route", post(route_handler))
        .route("/api/v1/locations", get(locations_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Turn a handler panic into a 500 problem instead of a dropped connection.
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    let request_id = RequestId::generate();
    error!(request_id = %request_id, panic = detail, "request handler panicked");

    ProblemDetails::internal_error("unexpected internal error", request_id.as_str())
        .into_response()
}

/// `POST /api/v1/route`.
///
/// Broker failures are returned as 200 with `success: false`; only an
/// invalid body or a broker that stopped admitting work produce problem
/// details.
pub async fn route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    let request_id = RequestId::from_headers(&headers);

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_route_failed("validation_error");
            return with_request_id(
                ProblemDetails::from_rejection(&rejection, request_id.as_str()).into_response(),
                &request_id,
            );
        }
    };

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error");
        return with_request_id(problem.into_response(), &request_id);
    }

    info!(
        request_id = %request_id,
        algorithm = %request.algorithm,
        from = %request.from,
        to = %request.to,
        "handling route request"
    );

    let reply = state.broker().find_path(&request.to_query()).await;

    match &reply.result {
        RouteResult::Success(success) => {
            record_route_computed(success.format.label());
            record_route_waypoints(success.path.len());
            info!(
                request_id = %request_id,
                format = success.format.label(),
                waypoints = success.path.len(),
                map_link = reply.map_link.is_some(),
                "route computed"
            );
        }
        RouteResult::Failure(failure) if failure.kind == FailureKind::Unavailable => {
            record_route_failed(failure.kind.label());
            warn!(request_id = %request_id, "route rejected during shutdown");
            return with_request_id(
                ProblemDetails::unavailable(failure.message.clone(), request_id.as_str())
                    .into_response(),
                &request_id,
            );
        }
        RouteResult::Failure(failure) => {
            record_route_failed(failure.kind.label());
            warn!(
                request_id = %request_id,
                reason = failure.kind.label(),
                error = %failure.message,
                "route computation failed"
            );
        }
    }

    with_request_id(
        ServiceResponse::new(RouteResponse::from(reply)).into_response(),
        &request_id,
    )
}

/// `GET /api/v1/locations`.
pub async fn locations_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceResponse::new(LocationsResponse::from(
        state.broker().gazetteer(),
    )))
}

fn with_request_id(mut response: Response, request_id: &RequestId) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
