//! Shared mock providers and planner builders for integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use freightlane_lib::{
    CatalogResolver, Coordinate, Error, FreightPlanner, LandRouteProvider, LegGeometry,
    PlannerConfig, PortCatalog, Result, SeaRouteProvider,
};

/// Coordinates of inland places used across tests.
pub const BOGOTA: Coordinate = Coordinate { lat: 4.711, lon: -74.072 };
#[allow(dead_code)]
pub const MADRID: Coordinate = Coordinate { lat: 40.42, lon: -3.70 };
#[allow(dead_code)]
pub const MEDELLIN: Coordinate = Coordinate { lat: 6.25, lon: -75.56 };

/// Catalog resolver knowing the built-in ports plus a few inland cities.
pub fn resolver() -> Arc<CatalogResolver> {
    Arc::new(
        CatalogResolver::new(Arc::new(PortCatalog::builtin().clone()))
            .with_place("Bogotá", BOGOTA)
            .with_place("Madrid", MADRID)
            .with_place("Medellín", MEDELLIN),
    )
}

pub fn planner(
    sea: Arc<dyn SeaRouteProvider>,
    land: Arc<dyn LandRouteProvider>,
) -> FreightPlanner {
    FreightPlanner::new(resolver(), sea, land).with_config(PlannerConfig::default())
}

/// Linear polyline with `points` vertices between two coordinates.
fn interpolate(origin: &Coordinate, destination: &Coordinate, points: usize) -> Vec<Coordinate> {
    let steps = points.max(2) - 1;
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Coordinate {
                lat: origin.lat + t * (destination.lat - origin.lat),
                lon: origin.lon + t * (destination.lon - origin.lon),
            }
        })
        .collect()
}

/// Returns a fixed-size polyline and distance after an optional delay.
///
/// Records its name in `completions` when a call finishes.
#[derive(Clone)]
pub struct FixedProvider {
    pub name: &'static str,
    pub points: usize,
    pub distance_km: f64,
    pub delay: Duration,
    pub completions: Arc<Mutex<Vec<&'static str>>>,
}

#[allow(dead_code)]
impl FixedProvider {
    pub fn new(name: &'static str, points: usize, distance_km: f64) -> Self {
        Self {
            name,
            points,
            distance_km,
            delay: Duration::ZERO,
            completions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_log(mut self, completions: Arc<Mutex<Vec<&'static str>>>) -> Self {
        self.completions = completions;
        self
    }

    async fn geometry(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completions.lock().unwrap().push(self.name);
        Ok(LegGeometry {
            waypoints: interpolate(origin, destination, self.points),
            distance_km: self.distance_km,
        })
    }
}

#[async_trait]
impl SeaRouteProvider for FixedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        self.geometry(origin, destination).await
    }
}

#[async_trait]
impl LandRouteProvider for FixedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        self.geometry(origin, destination).await
    }
}

/// Always fails with `RoutingUnavailable`.
#[allow(dead_code)]
pub struct FailingProvider;

#[async_trait]
impl SeaRouteProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn route(&self, _: &Coordinate, _: &Coordinate) -> Result<LegGeometry> {
        Err(Error::routing_unavailable("failing", "engine unreachable"))
    }
}

#[async_trait]
impl LandRouteProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn route(&self, _: &Coordinate, _: &Coordinate) -> Result<LegGeometry> {
        Err(Error::routing_unavailable("failing", "engine unreachable"))
    }
}

/// Sleeps for `delay` and flags completion, so tests can observe cancellation.
#[allow(dead_code)]
#[derive(Clone)]
pub struct StallingProvider {
    pub delay: Duration,
    pub started: Arc<AtomicBool>,
    pub finished: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl StallingProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn stall(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(LegGeometry::straight_line(origin, destination))
    }
}

#[async_trait]
impl SeaRouteProvider for StallingProvider {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        self.stall(origin, destination).await
    }
}

#[async_trait]
impl LandRouteProvider for StallingProvider {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        self.stall(origin, destination).await
    }
}

/// Snaps both endpoints `offset_deg` away from the requested coordinates,
/// the way real engines snap onto their own network.
#[allow(dead_code)]
pub struct OffsetProvider {
    pub offset_deg: f64,
    pub distance_km: f64,
}

#[allow(dead_code)]
impl OffsetProvider {
    pub fn snapped(&self, origin: &Coordinate, destination: &Coordinate) -> (Coordinate, Coordinate) {
        (
            Coordinate {
                lat: origin.lat + self.offset_deg,
                lon: origin.lon + self.offset_deg,
            },
            Coordinate {
                lat: destination.lat - self.offset_deg,
                lon: destination.lon - self.offset_deg,
            },
        )
    }
}

#[async_trait]
impl SeaRouteProvider for OffsetProvider {
    fn name(&self) -> &str {
        "offset"
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        let (start, end) = self.snapped(origin, destination);
        Ok(LegGeometry {
            waypoints: vec![start, Coordinate { lat: 0.0, lon: 60.0 }, end],
            distance_km: self.distance_km,
        })
    }
}
