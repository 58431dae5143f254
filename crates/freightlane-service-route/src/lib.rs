//! Freightlane route planning HTTP API.
//!
//! # Endpoints
//!
//! - `POST /api/v1/route` - plan and validate a route, returned as route JSON
//! - `POST /api/v1/route/geojson` - plan a route, returned as a dateline-safe FeatureCollection
//! - `GET /api/v1/ports` - list the port catalog
//! - `GET /metrics` - Prometheus metrics (path configurable)
//! - `GET /health/live`, `GET /health/ready` - Kubernetes probes
//!
//! A client disconnect drops the handler future, which cancels every
//! in-flight provider call for that request.

#![deny(warnings)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use freightlane_lib::{
    to_geojson, validate, Error as LibError, PortCatalogEntry, Route, ValidationReport,
};
use freightlane_service_shared::{
    failure_reason, from_lib_error, health_live, health_ready, metrics_handler,
    record_route_failed, record_route_planned, AppState, MetricsLayer, PlanRouteRequest,
    ProblemDetails, RequestId, ServiceResponse, Validate,
};

/// Label used for this service in metrics.
pub const SERVICE_NAME: &str = "route";

const GEOJSON_CONTENT_TYPE: &str = "application/geo+json";

/// Body of `POST /api/v1/route`.
#[derive(Debug, Serialize)]
pub struct RoutePlanResponse {
    pub route: Route,
    pub validation: ValidationReport,
}

/// Body of `GET /api/v1/ports`.
#[derive(Debug, Serialize)]
pub struct PortsResponse {
    pub count: usize,
    pub ports: Vec<PortCatalogEntry>,
}

/// Build the service router.
pub fn app(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route("/api/v1/route", post(route_handler))
        .route("/api/v1/route/geojson", post(route_geojson_handler))
        .route("/api/v1/ports", get(ports_handler))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

async fn route_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<PlanRouteRequest>, JsonRejection>,
) -> Result<ServiceResponse<RoutePlanResponse>, ProblemDetails> {
    let (route, validation) = plan(&state, &request_id, payload).await?;
    Ok(ServiceResponse::new(RoutePlanResponse { route, validation })
        .with_request_id(request_id.as_str()))
}

async fn route_geojson_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<PlanRouteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ProblemDetails> {
    let (route, _) = plan(&state, &request_id, payload).await?;
    Ok((
        [(header::CONTENT_TYPE, GEOJSON_CONTENT_TYPE)],
        Json(to_geojson(&route)),
    ))
}

async fn ports_handler(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ServiceResponse<PortsResponse> {
    let ports = state.planner().catalog().entries().to_vec();
    ServiceResponse::new(PortsResponse {
        count: ports.len(),
        ports,
    })
    .with_request_id(request_id.as_str())
}

/// Shared body of both route endpoints: validate, plan, check, record.
async fn plan(
    state: &AppState,
    request_id: &RequestId,
    payload: Result<Json<PlanRouteRequest>, JsonRejection>,
) -> Result<(Route, ValidationReport), ProblemDetails> {
    let Json(request) = payload.map_err(|rejection| {
        record_route_failed("validation_error", SERVICE_NAME);
        ProblemDetails::bad_request(rejection.body_text(), request_id.as_str())
    })?;

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error", SERVICE_NAME);
        return Err(*problem);
    }

    info!(
        from = %request.from,
        to = %request.to,
        cargo_weight_kg = request.cargo_weight_kg,
        "handling route request"
    );

    let route = match state.planner().plan_route(&request.from, &request.to).await {
        Ok(route) => route,
        Err(e) => {
            match &e {
                LibError::LocationNotFound { .. } => warn!(error = %e, "location not found"),
                _ => error!(error = %e, "route planning failed"),
            }
            record_route_failed(failure_reason(&e), SERVICE_NAME);
            return Err(from_lib_error(&e, request_id.as_str()));
        }
    };

    let report = validate(&route);
    record_route_planned(&route, &report, SERVICE_NAME);

    info!(
        plan = route.kind.slug(),
        segments = route.segments.len(),
        total_distance_km = route.total_distance_km,
        warnings = report.warnings.len(),
        "route planned successfully"
    );

    Ok((route, report))
}
