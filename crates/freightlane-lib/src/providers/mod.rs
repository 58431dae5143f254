//! Capability interfaces for the external collaborators of the planner and
//! their concrete adapters.
//!
//! - [`LocationResolver`] turns a free-text name into a coordinate
//! - [`SeaRouteProvider`] turns two ports into a maritime polyline
//! - [`LandRouteProvider`] turns two land points into a driving polyline
//!
//! Every failure of a segment provider is reported as
//! [`Error::RoutingUnavailable`] so callers never observe provider-specific
//! error shapes.

mod catalog;
mod great_circle;
mod nominatim;
mod osrm;
mod searoute;

pub use catalog::{CatalogResolver, ResolverChain};
pub use great_circle::GreatCircleProvider;
pub use nominatim::{NominatimResolver, NOMINATIM_PUBLIC_URL};
pub use osrm::OsrmLandProvider;
pub use searoute::SeaRouteProcessProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{great_circle_distance_km, Coordinate};

/// Polyline and distance produced by a segment provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegGeometry {
    pub waypoints: Vec<Coordinate>,
    pub distance_km: f64,
}

impl LegGeometry {
    /// Two-point straight line whose distance is the great-circle distance.
    pub fn straight_line(origin: &Coordinate, destination: &Coordinate) -> Self {
        Self {
            waypoints: vec![origin.normalized(), destination.normalized()],
            distance_km: great_circle_distance_km(origin, destination),
        }
    }

    /// Reject geometry that cannot form a segment.
    ///
    /// A usable polyline has at least two finite vertices and a finite,
    /// non-negative distance.
    pub fn validate(self, provider: &str) -> Result<Self> {
        if self.waypoints.len() < 2 {
            return Err(Error::routing_unavailable(
                provider,
                format!("returned {} waypoint(s)", self.waypoints.len()),
            ));
        }
        if self.waypoints.iter().any(|c| !c.is_finite()) {
            return Err(Error::routing_unavailable(provider, "returned non-finite waypoint"));
        }
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(Error::routing_unavailable(
                provider,
                format!("returned invalid distance {}", self.distance_km),
            ));
        }
        Ok(self)
    }
}

/// Resolves a place name into a coordinate.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Resolve `name`, failing with [`Error::LocationNotFound`] when unknown.
    async fn resolve(&self, name: &str) -> Result<Coordinate>;
}

/// Computes maritime geometry between two ports.
#[async_trait]
pub trait SeaRouteProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fails with [`Error::RoutingUnavailable`] when no path can be produced.
    async fn route(&self, origin_port: &Coordinate, destination_port: &Coordinate) -> Result<LegGeometry>;
}

/// Computes road geometry between two land points.
#[async_trait]
pub trait LandRouteProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fails with [`Error::RoutingUnavailable`] on network or API failure.
    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry>;
}

/// Convert any adapter error into [`Error::RoutingUnavailable`].
pub(crate) fn unavailable(provider: &str, err: impl std::fmt::Display) -> Error {
    Error::routing_unavailable(provider, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_uses_great_circle_distance() {
        let a = Coordinate { lat: 0.0, lon: 0.0 };
        let b = Coordinate { lat: 0.0, lon: 1.0 };
        let geometry = LegGeometry::straight_line(&a, &b);
        assert_eq!(geometry.waypoints, vec![a, b]);
        assert_eq!(geometry.distance_km, great_circle_distance_km(&a, &b));
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        let a = Coordinate { lat: 0.0, lon: 0.0 };
        let single = LegGeometry {
            waypoints: vec![a],
            distance_km: 0.0,
        };
        assert!(matches!(
            single.validate("mock"),
            Err(Error::RoutingUnavailable { .. })
        ));

        let negative = LegGeometry {
            waypoints: vec![a, a],
            distance_km: -1.0,
        };
        assert!(negative.validate("mock").is_err());

        let nan = LegGeometry {
            waypoints: vec![a, Coordinate { lat: f64::NAN, lon: 0.0 }],
            distance_km: 1.0,
        };
        assert!(nan.validate("mock").is_err());
    }
}
