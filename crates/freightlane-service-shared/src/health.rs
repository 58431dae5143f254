//! Health check handlers for Kubernetes probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of `/health/live` and `/health/ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,

    /// Ports in the loaded catalog (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports_loaded: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            ports_loaded: None,
        }
    }

    pub fn ready(service: &str, version: &str, ports: usize) -> Self {
        Self {
            ports_loaded: Some(ports),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Liveness probe; never touches the planner.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe.
///
/// Every plan classifies against the port catalog, so an empty catalog
/// means the service cannot answer route requests.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let ports = state.port_count();
    if ports == 0 {
        let status = HealthStatus::not_ready(service, version, "port catalog is empty");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    (
        StatusCode::OK,
        Json(HealthStatus::ready(service, version, ports)),
    )
        .into_response()
}
