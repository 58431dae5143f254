//! Heuristic quality checks over assembled routes.
//!
//! Every rule is independent and only appends messages. Warnings make a
//! route invalid; suggestions never do.

use serde::{Deserialize, Serialize};

use crate::route::{Route, RouteSegment, SegmentMode, SegmentSource};

/// Segments longer than this are reported as unusually long.
pub const LONG_SEGMENT_KM: f64 = 15_000.0;
/// Segments with fewer than [`MIN_DETAILED_WAYPOINTS`] waypoints over this distance are oversimplified.
pub const OVERSIMPLIFIED_KM: f64 = 1_000.0;
pub const MIN_DETAILED_WAYPOINTS: usize = 3;
/// Waypoints beyond this absolute longitude are near the antimeridian.
pub const ANTIMERIDIAN_LON: f64 = 170.0;
/// A land leg shorter than this between two sea legs is a short land bridge.
pub const SHORT_LAND_BRIDGE_KM: f64 = 100.0;
/// Sea share of total distance outside `[MIN, MAX]` triggers a balance suggestion.
pub const MAX_SEA_SHARE: f64 = 0.9;
pub const MIN_SEA_SHARE: f64 = 0.1;

/// Result of validating a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    fn warn(&mut self, warning: String, suggestion: String) {
        self.warnings.push(warning);
        self.suggestions.push(suggestion);
    }
}

/// Run every heuristic against `route`. Never fails.
pub fn validate(route: &Route) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, segment) in route.segments.iter().enumerate() {
        let number = index + 1;
        check_length(&mut report, number, segment);
        check_detail(&mut report, number, segment);
        check_antimeridian(&mut report, number, segment);
        if let SegmentSource::Fallback { reason } = &segment.source {
            report.suggestions.push(format!(
                "Segment {number} uses straight-line geometry ({reason}); re-plan once the routing provider is available"
            ));
        }
    }

    check_land_bridges(&mut report, &route.segments);
    check_mode_balance(&mut report, route);

    report.is_valid = report.warnings.is_empty();
    report
}

fn check_length(report: &mut ValidationReport, number: usize, segment: &RouteSegment) {
    if segment.distance_km <= LONG_SEGMENT_KM {
        return;
    }
    let suggestion = match segment.mode {
        SegmentMode::Sea => {
            format!("Consider breaking sea segment {number} via an intermediate port")
        }
        SegmentMode::Land => {
            format!("Consider a multimodal split for land segment {number}")
        }
    };
    report.warn(
        format!(
            "Segment {number}: unusually long {} segment ({:.0} km)",
            segment.mode, segment.distance_km
        ),
        suggestion,
    );
}

fn check_detail(report: &mut ValidationReport, number: usize, segment: &RouteSegment) {
    if segment.waypoints.len() >= MIN_DETAILED_WAYPOINTS || segment.distance_km <= OVERSIMPLIFIED_KM {
        return;
    }
    report.warn(
        format!(
            "Segment {number}: oversimplified route ({} waypoints over {:.0} km)",
            segment.waypoints.len(),
            segment.distance_km
        ),
        format!("Request denser waypoints from the routing provider for segment {number}"),
    );
}

fn check_antimeridian(report: &mut ValidationReport, number: usize, segment: &RouteSegment) {
    let near_dateline = segment
        .waypoints
        .iter()
        .any(|c| c.lon.abs() > ANTIMERIDIAN_LON);
    if !near_dateline {
        return;
    }
    let (min, max) = segment
        .waypoints
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), c| {
            (min.min(c.lon), max.max(c.lon))
        });
    if max - min > 180.0 {
        report.warn(
            format!("Segment {number}: possible antimeridian crossing issue"),
            format!("Verify routing accuracy for segment {number} near the antimeridian"),
        );
    }
}

fn check_land_bridges(report: &mut ValidationReport, segments: &[RouteSegment]) {
    for (offset, triple) in segments.windows(3).enumerate() {
        let [before, bridge, after] = triple else {
            continue;
        };
        if before.mode == SegmentMode::Sea
            && bridge.mode == SegmentMode::Land
            && after.mode == SegmentMode::Sea
            && bridge.distance_km < SHORT_LAND_BRIDGE_KM
        {
            let number = offset + 2;
            report.warn(
                format!(
                    "Segment {number}: short land bridge between sea legs ({:.0} km)",
                    bridge.distance_km
                ),
                format!("Evaluate a sea bypass instead of the land bridge at segment {number}"),
            );
        }
    }
}

fn check_mode_balance(report: &mut ValidationReport, route: &Route) {
    if route.total_distance_km <= 0.0 {
        return;
    }
    let share = route.distance_by_mode(SegmentMode::Sea) / route.total_distance_km;
    if share > MAX_SEA_SHARE {
        report.suggestions.push(format!(
            "Route is {:.0}% sea; reconsider the sea/land balance for inland access",
            share * 100.0
        ));
    } else if share < MIN_SEA_SHARE {
        report.suggestions.push(format!(
            "Route is {:.0}% sea; reconsider the sea/land balance for long-haul efficiency",
            share * 100.0
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::route::RouteKind;

    fn segment(mode: SegmentMode, distance_km: f64, waypoints: Vec<(f64, f64)>) -> RouteSegment {
        let waypoints: Vec<Coordinate> = waypoints
            .into_iter()
            .map(|(lat, lon)| Coordinate { lat, lon })
            .collect();
        RouteSegment {
            mode,
            origin: waypoints[0],
            destination: waypoints[waypoints.len() - 1],
            waypoints,
            description: String::new(),
            distance_km,
            source: SegmentSource::Provider {
                name: "test".to_string(),
            },
        }
    }

    fn dense() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (0.0, 10.0), (0.0, 20.0)]
    }

    #[test]
    fn long_sea_segment_yields_one_warning() {
        let route = Route::new(
            RouteKind::PortToPort,
            vec![segment(SegmentMode::Sea, 20_000.0, dense())],
            "test",
        );
        let report = validate(&route);
        assert!(!report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("unusually long sea segment"));
        assert!(report.suggestions.iter().any(|s| s.contains("intermediate port")));
    }

    #[test]
    fn clean_route_is_valid() {
        let route = Route::new(
            RouteKind::PortToInland,
            vec![
                segment(SegmentMode::Sea, 8_000.0, dense()),
                segment(SegmentMode::Land, 900.0, vec![(0.0, 20.0), (1.0, 21.0)]),
            ],
            "test",
        );
        let report = validate(&route);
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn sparse_long_segment_is_oversimplified() {
        let route = Route::new(
            RouteKind::LandOnly,
            vec![segment(SegmentMode::Land, 1_500.0, vec![(0.0, 0.0), (0.0, 13.0)])],
            "test",
        );
        let report = validate(&route);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("oversimplified"));
    }

    #[test]
    fn dateline_spread_is_flagged() {
        let route = Route::new(
            RouteKind::PortToPort,
            vec![segment(
                SegmentMode::Sea,
                9_000.0,
                vec![(31.2, 121.8), (40.0, 175.0), (40.0, -175.0), (34.1, -118.2)],
            )],
            "test",
        );
        let report = validate(&route);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("possible antimeridian crossing")));
    }

    #[test]
    fn short_land_bridge_between_sea_legs() {
        let route = Route::new(
            RouteKind::InlandToInland,
            vec![
                segment(SegmentMode::Sea, 5_000.0, dense()),
                segment(SegmentMode::Land, 60.0, vec![(0.0, 20.0), (0.0, 20.5)]),
                segment(SegmentMode::Sea, 5_000.0, dense()),
            ],
            "test",
        );
        let report = validate(&route);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Segment 2: short land bridge"));
    }

    #[test]
    fn fallback_and_balance_only_suggest() {
        let mut land = segment(SegmentMode::Land, 800.0, vec![(0.0, 0.0), (0.0, 7.0)]);
        land.source = SegmentSource::Fallback {
            reason: "osrm timed out".to_string(),
        };
        let route = Route::new(RouteKind::LandOnly, vec![land], "test");
        let report = validate(&route);
        assert!(report.is_valid);
        assert_eq!(report.suggestions.len(), 2);
        assert!(report.suggestions[0].contains("osrm timed out"));
        assert!(report.suggestions[1].contains("0% sea"));
    }

    #[test]
    fn sea_dominant_route_gets_balance_suggestion() {
        let route = Route::new(
            RouteKind::PortToInland,
            vec![
                segment(SegmentMode::Sea, 8_000.0, dense()),
                segment(SegmentMode::Land, 100.0, vec![(0.0, 20.0), (0.0, 20.9)]),
            ],
            "test",
        );
        let report = validate(&route);
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
        assert_eq!(report.suggestions.len(), 1);
        assert!(report.suggestions[0].contains("99% sea"));
        assert!(report.suggestions[0].contains("inland access"));
    }
}
