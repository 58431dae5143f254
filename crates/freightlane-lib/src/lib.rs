//! Freightlane library entry points.
//!
//! This crate classifies locations against a port catalog, segments a
//! journey into sea and land legs, resolves those legs through pluggable
//! routing providers, and exports the result as dateline-safe GeoJSON with a
//! heuristic quality report. Higher-level consumers (CLI, HTTP service)
//! should only depend on the items exported here instead of reimplementing
//! behavior.
//!

#![deny(warnings)]

pub mod antimeridian;
pub mod config;
pub mod error;
pub mod geo;
pub mod geojson;
pub mod output;
pub mod ports;
pub mod providers;
pub mod route;
pub mod routing;
pub mod validate;

pub use antimeridian::{normalize_polyline, split_at_antimeridian};
pub use config::{build_planner, PlannerConfig, ProviderSettings};
pub use error::{Error, Result};
pub use geo::{great_circle_distance_km, normalize_longitude, Coordinate};
pub use geojson::{to_geojson, FeatureCollection};
pub use output::{RouteRenderMode, RouteSummary};
pub use ports::{Location, LocationKind, PortCatalog, PortCatalogEntry};
pub use providers::{
    CatalogResolver, GreatCircleProvider, LandRouteProvider, LegGeometry, LocationResolver,
    NominatimResolver, OsrmLandProvider, ResolverChain, SeaRouteProcessProvider, SeaRouteProvider,
};
pub use route::{Route, RouteKind, RouteSegment, SegmentMode, SegmentSource};
pub use routing::{assemble_route, plan_legs, FreightPlanner, Leg, SegmentationPlan};
pub use validate::{validate, ValidationReport};
