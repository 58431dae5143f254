use async_trait::async_trait;

use crate::error::Result;
use crate::geo::{densify_great_circle, great_circle_distance_km, Coordinate};

use super::{LandRouteProvider, LegGeometry, SeaRouteProvider};

/// Spacing between interpolated vertices in kilometres.
const DEFAULT_SPACING_KM: f64 = 250.0;

/// Offline provider that follows the great-circle arc between two points.
///
/// Serves both sea and land legs when no routing engine is configured. Long
/// legs are densified so renderers draw the arc rather than a chord.
#[derive(Debug, Clone)]
pub struct GreatCircleProvider {
    spacing_km: f64,
}

impl Default for GreatCircleProvider {
    fn default() -> Self {
        Self {
            spacing_km: DEFAULT_SPACING_KM,
        }
    }
}

impl GreatCircleProvider {
    /// Provider inserting a vertex roughly every `spacing_km` kilometres.
    pub fn with_spacing_km(spacing_km: f64) -> Self {
        Self {
            spacing_km: spacing_km.max(1.0),
        }
    }

    fn geometry(&self, origin: &Coordinate, destination: &Coordinate) -> LegGeometry {
        let distance_km = great_circle_distance_km(origin, destination);
        let intermediate = (distance_km / self.spacing_km).floor() as usize;
        LegGeometry {
            waypoints: densify_great_circle(origin, destination, intermediate),
            distance_km,
        }
    }
}

#[async_trait]
impl SeaRouteProvider for GreatCircleProvider {
    fn name(&self) -> &str {
        "great-circle"
    }

    async fn route(&self, origin_port: &Coordinate, destination_port: &Coordinate) -> Result<LegGeometry> {
        Ok(self.geometry(origin_port, destination_port))
    }
}

#[async_trait]
impl LandRouteProvider for GreatCircleProvider {
    fn name(&self) -> &str {
        "great-circle"
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        Ok(self.geometry(origin, destination))
    }
}
