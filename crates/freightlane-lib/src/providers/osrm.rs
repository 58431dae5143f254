use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{normalize_longitude, Coordinate};

use super::{unavailable, LandRouteProvider, LegGeometry};

const PROVIDER: &str = "osrm";
const USER_AGENT: &str = concat!("freightlane/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Metres.
    distance: f64,
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Road routing through an OSRM `/route/v1/driving` endpoint.
#[derive(Debug, Clone)]
pub struct OsrmLandProvider {
    client: Client,
    base_url: String,
}

impl OsrmLandProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, origin: &Coordinate, destination: &Coordinate) -> Result<RouteResponse> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, origin.lon, origin.lat, destination.lon, destination.lat
        );
        debug!(%url, "requesting road route");
        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl LandRouteProvider for OsrmLandProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn route(&self, origin: &Coordinate, destination: &Coordinate) -> Result<LegGeometry> {
        let origin = origin.normalized();
        let destination = destination.normalized();
        let response = self
            .fetch(&origin, &destination)
            .await
            .map_err(|err| unavailable(PROVIDER, err))?;

        if response.code != "Ok" {
            return Err(Error::routing_unavailable(
                PROVIDER,
                format!("server answered {}", response.code),
            ));
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| Error::routing_unavailable(PROVIDER, "no route returned"))?;

        let waypoints = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate {
                lat,
                lon: normalize_longitude(lon),
            })
            .collect();

        LegGeometry {
            waypoints,
            distance_km: route.distance / 1000.0,
        }
        .validate(PROVIDER)
    }
}
