//! Resolved route value objects shared by the assembler, validator, and exporters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Transport mode of a leg or segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMode {
    Sea,
    Land,
}

impl SegmentMode {
    pub fn label(self) -> &'static str {
        match self {
            SegmentMode::Sea => "sea",
            SegmentMode::Land => "land",
        }
    }
}

impl fmt::Display for SegmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of the plan chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    PortToPort,
    PortToInland,
    InlandToPort,
    InlandToInland,
    /// Inland/inland request collapsed into one direct land haul.
    LandOnly,
}

impl RouteKind {
    pub fn label(self) -> &'static str {
        match self {
            RouteKind::PortToPort => "Port to Port",
            RouteKind::PortToInland => "Port to Inland",
            RouteKind::InlandToPort => "Inland to Port",
            RouteKind::InlandToInland => "Inland to Inland",
            RouteKind::LandOnly => "Direct land route",
        }
    }

    /// Stable identifier for metrics labels.
    pub fn slug(self) -> &'static str {
        match self {
            RouteKind::PortToPort => "port_to_port",
            RouteKind::PortToInland => "port_to_inland",
            RouteKind::InlandToPort => "inland_to_port",
            RouteKind::InlandToInland => "inland_to_inland",
            RouteKind::LandOnly => "land_only",
        }
    }
}

/// Where a segment's geometry came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentSource {
    /// Geometry returned by the named routing provider.
    Provider { name: String },
    /// Straight-line substitute used after the provider failed.
    Fallback { reason: String },
}

impl SegmentSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SegmentSource::Fallback { .. })
    }
}

/// A resolved leg with concrete geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub mode: SegmentMode,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub waypoints: Vec<Coordinate>,
    pub description: String,
    pub distance_km: f64,
    pub source: SegmentSource,
}

impl RouteSegment {
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_fallback(&self) -> bool {
        self.source.is_fallback()
    }
}

/// A complete multi-segment journey.
///
/// Totals are computed once by [`Route::new`] and always equal the sums over
/// `segments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub kind: RouteKind,
    pub segments: Vec<RouteSegment>,
    pub total_distance_km: f64,
    pub total_waypoints: usize,
    pub description: String,
}

impl Route {
    /// Build a route and derive its totals from the segments.
    pub fn new(kind: RouteKind, segments: Vec<RouteSegment>, description: impl Into<String>) -> Self {
        let total_distance_km = segments.iter().map(|s| s.distance_km).sum();
        let total_waypoints = segments.iter().map(|s| s.waypoints.len()).sum();
        Self {
            kind,
            segments,
            total_distance_km,
            total_waypoints,
            description: description.into(),
        }
    }

    /// Total distance covered by segments of `mode`.
    pub fn distance_by_mode(&self, mode: SegmentMode) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.mode == mode)
            .map(|s| s.distance_km)
            .sum()
    }

    /// Number of segments that fell back to straight-line geometry.
    pub fn fallback_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_fallback()).count()
    }

    pub fn origin(&self) -> Option<&Coordinate> {
        self.segments.first().map(|s| &s.origin)
    }

    pub fn destination(&self) -> Option<&Coordinate> {
        self.segments.last().map(|s| &s.destination)
    }
}
