//! Freight route planning.
//!
//! This module provides:
//! - [`plan_legs`] - the segmentation decision table
//! - [`assemble_route`] - concurrent leg resolution with straight-line fallback
//! - [`FreightPlanner`] - the request-level entry point tying resolver,
//!   classifier, planner and providers together
//!
//! # Example
//!
//! ```ignore
//! use freightlane_lib::{build_planner, PlannerConfig, ProviderSettings};
//!
//! let planner = build_planner(&ProviderSettings::default(), PlannerConfig::default())?;
//! let route = planner.plan_route("Shanghai", "Rotterdam").await?;
//! println!("{}: {:.0} km", route.description, route.total_distance_km);
//! ```

mod assembler;
mod planner;

pub use assembler::assemble_route;
pub use planner::{plan_legs, Leg, SegmentationPlan};

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::geo::Coordinate;
use crate::ports::{Location, PortCatalog};
use crate::providers::{LandRouteProvider, LocationResolver, SeaRouteProvider};
use crate::route::Route;

/// Stateless per-request planner over injected capabilities.
///
/// Cloning is cheap; every collaborator is shared behind an `Arc` and the
/// port catalog is never mutated.
#[derive(Clone)]
pub struct FreightPlanner {
    resolver: Arc<dyn LocationResolver>,
    sea: Arc<dyn SeaRouteProvider>,
    land: Arc<dyn LandRouteProvider>,
    catalog: Arc<PortCatalog>,
    config: PlannerConfig,
}

impl FreightPlanner {
    /// Planner over the built-in port catalog and default configuration.
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        sea: Arc<dyn SeaRouteProvider>,
        land: Arc<dyn LandRouteProvider>,
    ) -> Self {
        Self {
            resolver,
            sea,
            land,
            catalog: Arc::new(PortCatalog::builtin().clone()),
            config: PlannerConfig::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<PortCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &PortCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Classify an already-resolved coordinate.
    pub fn classify(&self, name: impl Into<String>, coordinate: Coordinate) -> Location {
        Location::classified(name, coordinate, &self.catalog, self.config.port_threshold_km)
    }

    /// Resolve and classify a named location.
    pub async fn locate(&self, name: &str) -> Result<Location> {
        let coordinate = self.resolver.resolve(name).await?;
        let location = self.classify(name, coordinate);
        debug!(
            name,
            kind = location.kind.label(),
            coordinate = %location.coordinate,
            "location classified"
        );
        Ok(location)
    }

    /// Run the decision table for two classified endpoints.
    pub fn segment(&self, origin: &Location, destination: &Location) -> SegmentationPlan {
        plan_legs(origin, destination, &self.catalog, &self.config)
    }

    /// Plan a complete route between two named locations.
    ///
    /// 1. Resolves both names concurrently (fatal on `LocationNotFound`)
    /// 2. Classifies each endpoint as port or inland
    /// 3. Builds the leg plan
    /// 4. Resolves every leg through the providers, falling back per leg
    pub async fn plan_route(&self, origin_name: &str, destination_name: &str) -> Result<Route> {
        let (origin, destination) =
            tokio::try_join!(self.locate(origin_name), self.locate(destination_name))?;

        let plan = self.segment(&origin, &destination);
        debug!(kind = plan.kind.slug(), legs = plan.legs.len(), "segmentation complete");

        let route = assemble_route(
            plan,
            Arc::clone(&self.sea),
            Arc::clone(&self.land),
            self.config.provider_timeout,
        )
        .await?;

        info!(
            origin = origin_name,
            destination = destination_name,
            kind = route.kind.slug(),
            segments = route.segments.len(),
            total_distance_km = route.total_distance_km,
            fallbacks = route.fallback_count(),
            "route planned"
        );
        Ok(route)
    }
}

impl std::fmt::Debug for FreightPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreightPlanner")
            .field("resolver", &self.resolver.name())
            .field("sea", &self.sea.name())
            .field("land", &self.land.name())
            .field("ports", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}
