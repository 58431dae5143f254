//! Prometheus metrics for Freightlane services.
//!
//! - [`MetricsConfig`] / [`init_metrics`]: install the Prometheus recorder once at startup
//! - [`metrics_handler`]: exposition endpoint
//! - [`record_route_planned`] / [`record_route_failed`]: planning outcome counters
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use freightlane_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use freightlane_lib::{Error as LibError, Route, SegmentMode, ValidationReport};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// `METRICS_ENABLED` (anything but `false` enables) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let path = std::env::var("METRICS_PATH")
            .ok()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Install the global Prometheus recorder.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Prometheus exposition text, or a comment line before [`init_metrics`].
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Planning metrics
// =============================================================================

/// Record a successfully planned and validated route.
///
/// - `freightlane_routes_planned_total{plan, service}`
/// - `freightlane_route_segments{plan}` histogram
/// - `freightlane_fallback_segments_total{mode}` per straight-line segment
/// - `freightlane_validation_warnings_total{service}`
pub fn record_route_planned(route: &Route, report: &ValidationReport, service: &str) {
    let plan = route.kind.slug();

    metrics::counter!(
        "freightlane_routes_planned_total",
        "plan" => plan,
        "service" => service.to_string()
    )
    .increment(1);

    metrics::histogram!("freightlane_route_segments", "plan" => plan)
        .record(route.segments.len() as f64);

    for mode in [SegmentMode::Sea, SegmentMode::Land] {
        let fallbacks = route
            .segments
            .iter()
            .filter(|s| s.mode == mode && s.is_fallback())
            .count();
        if fallbacks > 0 {
            metrics::counter!("freightlane_fallback_segments_total", "mode" => mode.label())
                .increment(fallbacks as u64);
        }
    }

    if !report.warnings.is_empty() {
        metrics::counter!(
            "freightlane_validation_warnings_total",
            "service" => service.to_string()
        )
        .increment(report.warnings.len() as u64);
    }
}

/// Increment `freightlane_routes_failed_total{reason, service}`.
///
/// `reason` is one of the labels produced by [`failure_reason`], or
/// `validation_error` for requests rejected before planning.
pub fn record_route_failed(reason: &str, service: &str) {
    metrics::counter!(
        "freightlane_routes_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Low-cardinality label for a planning failure.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::LocationNotFound { .. } => "location_not_found",
        LibError::EmptyPlan => "empty_plan",
        LibError::InvalidCoordinate { .. } => "invalid_coordinate",
        LibError::RoutingUnavailable { .. } => "routing_unavailable",
        _ => "internal_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightlane_lib::{Coordinate, RouteKind, RouteSegment, SegmentSource};

    fn route_with_fallback() -> Route {
        let a = Coordinate::new(31.23, 121.47).unwrap();
        let b = Coordinate::new(51.92, 4.48).unwrap();
        let segment = RouteSegment {
            mode: SegmentMode::Sea,
            origin: a,
            destination: b,
            waypoints: vec![a, b],
            description: "Sea: Shanghai -> Rotterdam".to_string(),
            distance_km: 8_900.0,
            source: SegmentSource::Fallback {
                reason: "timed out after 30000ms".to_string(),
            },
        };
        Route::new(RouteKind::PortToPort, vec![segment], "Port to Port: Shanghai -> Rotterdam")
    }

    #[test]
    fn default_config_mounts_metrics_path() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn disabled_config_is_rejected() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert_eq!(init_metrics(&config), Err(MetricsError::Disabled));
    }

    #[tokio::test]
    async fn handler_renders_without_recorder() {
        let output = metrics_handler().await;
        assert!(output.starts_with('#') || output.is_empty());
    }

    #[test]
    fn failure_reasons_are_stable_labels() {
        let not_found = LibError::location_not_found("Atlantis");
        assert_eq!(failure_reason(&not_found), "location_not_found");
        assert_eq!(failure_reason(&LibError::EmptyPlan), "empty_plan");
        let io = LibError::Io(std::io::Error::other("disk"));
        assert_eq!(failure_reason(&io), "internal_error");
    }

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        let route = route_with_fallback();
        let report = ValidationReport {
            is_valid: false,
            warnings: vec!["Segment 1: oversimplified route".to_string()],
            suggestions: Vec::new(),
        };
        record_route_planned(&route, &report, "route");
        record_route_failed("validation_error", "route");
    }

    #[test]
    fn error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
