//! Planner tuning knobs and concrete provider wiring.
//!
//! # Environment Variables
//!
//! - `FREIGHTLANE_PORT_THRESHOLD_KM`: max distance to a catalog port for a location to count as a port (default 50)
//! - `FREIGHTLANE_COLLAPSE_LAND_LEG_KM`: both approach legs below this collapse an inland/inland plan (default 150)
//! - `FREIGHTLANE_DOMESTIC_HAUL_MAX_KM`: longest same-country haul served by land only (default 1500)
//! - `FREIGHTLANE_COLLAPSE_SAME_COUNTRY`: `true`/`false`, enables the same-country collapse (default true)
//! - `FREIGHTLANE_PROVIDER_TIMEOUT_SECS`: per-call provider timeout (default 30)
//! - `FREIGHTLANE_NOMINATIM_URL`, `FREIGHTLANE_OSRM_URL`, `FREIGHTLANE_SEAROUTE_DIR`,
//!   `FREIGHTLANE_PLACES_PATH`, `FREIGHTLANE_PORTS_PATH`: optional adapter settings

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::ports::PortCatalog;
use crate::providers::{
    CatalogResolver, GreatCircleProvider, LandRouteProvider, LocationResolver, NominatimResolver,
    OsrmLandProvider, ResolverChain, SeaRouteProcessProvider, SeaRouteProvider,
};
use crate::routing::FreightPlanner;

pub const DEFAULT_PORT_THRESHOLD_KM: f64 = 50.0;
pub const DEFAULT_COLLAPSE_LAND_LEG_KM: f64 = 150.0;
pub const DEFAULT_DOMESTIC_HAUL_MAX_KM: f64 = 1500.0;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning parameters for segmentation and leg resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// A location is a port iff its nearest catalog port is within this distance.
    pub port_threshold_km: f64,
    /// Inland/inland plans collapse to land-only when both approach legs are shorter.
    pub collapse_land_leg_km: f64,
    /// Longest direct haul collapsed to land-only when both nearest ports share a country.
    pub domestic_haul_max_km: f64,
    /// Enable the same-country collapse rule.
    pub collapse_same_country: bool,
    /// Timeout applied to every provider call.
    pub provider_timeout: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            port_threshold_km: DEFAULT_PORT_THRESHOLD_KM,
            collapse_land_leg_km: DEFAULT_COLLAPSE_LAND_LEG_KM,
            domestic_haul_max_km: DEFAULT_DOMESTIC_HAUL_MAX_KM,
            collapse_same_country: true,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

impl PlannerConfig {
    /// Read overrides from the environment, keeping defaults for unset or invalid values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port_threshold_km: env_parse("FREIGHTLANE_PORT_THRESHOLD_KM")
                .unwrap_or(defaults.port_threshold_km),
            collapse_land_leg_km: env_parse("FREIGHTLANE_COLLAPSE_LAND_LEG_KM")
                .unwrap_or(defaults.collapse_land_leg_km),
            domestic_haul_max_km: env_parse("FREIGHTLANE_DOMESTIC_HAUL_MAX_KM")
                .unwrap_or(defaults.domestic_haul_max_km),
            collapse_same_country: env_parse("FREIGHTLANE_COLLAPSE_SAME_COUNTRY")
                .unwrap_or(defaults.collapse_same_country),
            provider_timeout: env_parse::<u64>("FREIGHTLANE_PROVIDER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider_timeout),
        }
    }

    pub fn with_port_threshold_km(mut self, km: f64) -> Self {
        self.port_threshold_km = km;
        self
    }

    pub fn with_collapse_land_leg_km(mut self, km: f64) -> Self {
        self.collapse_land_leg_km = km;
        self
    }

    pub fn with_domestic_haul_max_km(mut self, km: f64) -> Self {
        self.domestic_haul_max_km = km;
        self
    }

    pub fn with_collapse_same_country(mut self, enabled: bool) -> Self {
        self.collapse_same_country = enabled;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}

/// Optional endpoints and data files for the concrete adapters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSettings {
    /// Base URL of a Nominatim-compatible geocoder.
    pub nominatim_url: Option<String>,
    /// Base URL of an OSRM routing server.
    pub osrm_url: Option<String>,
    /// Directory containing `searoute.jar`.
    pub searoute_dir: Option<PathBuf>,
    /// CSV gazetteer of extra named places (`name,lat,lon`).
    pub places_path: Option<PathBuf>,
    /// CSV port catalog replacing the built-in one (`name,country,lat,lon`).
    pub ports_path: Option<PathBuf>,
}

impl ProviderSettings {
    pub fn from_env() -> Self {
        Self {
            nominatim_url: env_string("FREIGHTLANE_NOMINATIM_URL"),
            osrm_url: env_string("FREIGHTLANE_OSRM_URL"),
            searoute_dir: env_string("FREIGHTLANE_SEAROUTE_DIR").map(PathBuf::from),
            places_path: env_string("FREIGHTLANE_PLACES_PATH").map(PathBuf::from),
            ports_path: env_string("FREIGHTLANE_PORTS_PATH").map(PathBuf::from),
        }
    }
}

/// Wire a [`FreightPlanner`] from settings.
///
/// The catalog resolver is always consulted first; Nominatim is appended when
/// configured. Without OSRM or SeaRoute settings the corresponding legs use
/// densified great-circle geometry.
pub fn build_planner(settings: &ProviderSettings, config: PlannerConfig) -> Result<FreightPlanner> {
    let catalog = match &settings.ports_path {
        Some(path) => {
            info!(path = %path.display(), "loading port catalog");
            Arc::new(PortCatalog::from_path(path)?)
        }
        None => Arc::new(PortCatalog::builtin().clone()),
    };

    let mut catalog_resolver = CatalogResolver::new(Arc::clone(&catalog));
    if let Some(path) = &settings.places_path {
        info!(path = %path.display(), "loading place gazetteer");
        catalog_resolver = catalog_resolver.with_places_from_path(path)?;
    }

    let mut resolvers: Vec<Arc<dyn LocationResolver>> = vec![Arc::new(catalog_resolver)];
    if let Some(url) = &settings.nominatim_url {
        resolvers.push(Arc::new(NominatimResolver::new(url.clone())?));
    }
    let resolver = Arc::new(ResolverChain::new(resolvers));

    let sea: Arc<dyn SeaRouteProvider> = match &settings.searoute_dir {
        Some(dir) => Arc::new(SeaRouteProcessProvider::new(dir.clone())),
        None => Arc::new(GreatCircleProvider::default()),
    };
    let land: Arc<dyn LandRouteProvider> = match &settings.osrm_url {
        Some(url) => Arc::new(OsrmLandProvider::new(url.clone())?),
        None => Arc::new(GreatCircleProvider::default()),
    };

    Ok(FreightPlanner::new(resolver, sea, land)
        .with_catalog(catalog)
        .with_config(config))
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_constants() {
        let config = PlannerConfig::default();
        assert_eq!(config.port_threshold_km, 50.0);
        assert_eq!(config.collapse_land_leg_km, 150.0);
        assert_eq!(config.domestic_haul_max_km, 1500.0);
        assert!(config.collapse_same_country);
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_setters_override_fields() {
        let config = PlannerConfig::default()
            .with_port_threshold_km(10.0)
            .with_collapse_same_country(false)
            .with_provider_timeout(Duration::from_millis(250));
        assert_eq!(config.port_threshold_km, 10.0);
        assert!(!config.collapse_same_country);
        assert_eq!(config.provider_timeout, Duration::from_millis(250));
    }

    #[test]
    fn build_planner_without_settings_is_offline() {
        let planner = build_planner(&ProviderSettings::default(), PlannerConfig::default())
            .expect("offline planner builds");
        assert_eq!(planner.catalog().len(), 23);
    }
}
