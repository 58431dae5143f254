use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

use super::LocationResolver;

const USER_AGENT: &str = concat!("freightlane/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Public OpenStreetMap Nominatim endpoint.
pub const NOMINATIM_PUBLIC_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: Client,
    base_url: String,
}

impl NominatimResolver {
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
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn resolve(&self, name: &str) -> Result<Coordinate> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, name, "geocoding location");

        let hits: Vec<SearchHit> = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("q", name), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(hit) = hits.into_iter().next() else {
            return Err(Error::location_not_found(name));
        };

        let parse = |value: &str| {
            value.trim().parse::<f64>().map_err(|_| Error::location_not_found(name))
        };
        Coordinate::new(parse(&hit.lat)?, parse(&hit.lon)?)
    }
}
