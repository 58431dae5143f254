use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{normalize_longitude, polyline_length_km, Coordinate};

use super::{unavailable, LegGeometry, SeaRouteProvider};

const PROVIDER: &str = "searoute";
const JAR_NAME: &str = "searoute.jar";
const DEFAULT_RESOLUTION: u32 = 20;
const PROCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Maritime routing through the SeaRoute command line tool.
///
/// Each call writes a one-row CSV into a scratch directory, runs
/// `java -jar searoute.jar` against it and reads back the GeoJSON result.
#[derive(Debug, Clone)]
pub struct SeaRouteProcessProvider {
    dir: PathBuf,
    java: PathBuf,
    resolution: u32,
}

impl SeaRouteProcessProvider {
    /// Provider using `searoute.jar` located in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            java: PathBuf::from("java"),
            resolution: DEFAULT_RESOLUTION,
        }
    }

    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    fn jar_path(&self) -> PathBuf {
        self.dir.join(JAR_NAME)
    }

    async fn run(&self, origin: &Coordinate, destination: &Coordinate) -> Result<Vec<Coordinate>> {
        let jar = self.jar_path();
        if !jar.is_file() {
            return Err(Error::routing_unavailable(
                PROVIDER,
                format!("{} not found", jar.display()),
            ));
        }

        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.csv");
        let output = scratch.path().join("output.geojson");
        tokio::fs::write(&input, request_csv(origin, destination)).await?;

        let mut command = Command::new(&self.java);
        command
            .arg("-jar")
            .arg(&jar)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-res")
            .arg(self.resolution.to_string())
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(jar = %jar.display(), "running searoute");
        let finished = tokio::time::timeout(PROCESS_TIMEOUT, command.output())
            .await
            .map_err(|_| Error::routing_unavailable(PROVIDER, "process timed out"))??;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            warn!(status = %finished.status, stderr = %stderr.trim(), "searoute exited with failure");
            return Err(Error::routing_unavailable(
                PROVIDER,
                format!("process exited with {}", finished.status),
            ));
        }

        let text = tokio::fs::read_to_string(&output).await?;
        parse_route_geojson(&text)
    }
}

#[async_trait]
impl SeaRouteProvider for SeaRouteProcessProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn route(&self, origin_port: &Coordinate, destination_port: &Coordinate) -> Result<LegGeometry> {
        let waypoints = self
            .run(&origin_port.normalized(), &destination_port.normalized())
            .await
            .map_err(|err| match err {
                Error::RoutingUnavailable { .. } => err,
                other => unavailable(PROVIDER, other),
            })?;
        let distance_km = polyline_length_km(&waypoints);
        LegGeometry {
            waypoints,
            distance_km,
        }
        .validate(PROVIDER)
    }
}

fn request_csv(origin: &Coordinate, destination: &Coordinate) -> String {
    format!(
        "route name,olon,olat,dlon,dlat\nroute,{},{},{},{}\n",
        origin.lon, origin.lat, destination.lon, destination.lat
    )
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    LineString(Vec<Vec<f64>>),
    MultiLineString(Vec<Vec<Vec<f64>>>),
}

/// Flatten the first line geometry of a SeaRoute GeoJSON document.
///
/// Multi-part lines are concatenated in order. Longitudes are normalized.
fn parse_route_geojson(text: &str) -> Result<Vec<Coordinate>> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let geometry = collection
        .features
        .into_iter()
        .find_map(|feature| feature.geometry)
        .ok_or_else(|| Error::routing_unavailable(PROVIDER, "output contained no geometry"))?;

    let positions = match geometry {
        Geometry::LineString(points) => points,
        Geometry::MultiLineString(parts) => parts.into_iter().flatten().collect(),
    };

    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(Coordinate {
                lat: *lat,
                lon: normalize_longitude(*lon),
            }),
            _ => Err(Error::routing_unavailable(PROVIDER, "malformed position")),
        })
        .collect()
}
