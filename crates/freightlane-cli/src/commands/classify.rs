//! Port/inland classification of a single place.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use freightlane_lib::{Coordinate, FreightPlanner, LocationKind};

use crate::output::OutputFormat;

/// What to classify: a name to resolve, or raw coordinates.
#[derive(Debug, Clone)]
pub enum ClassifyTarget {
    Name(String),
    Coordinate { lat: f64, lon: f64 },
}

#[derive(Debug, Serialize)]
struct Classification {
    name: String,
    coordinate: Coordinate,
    kind: LocationKind,
    nearest_port: Option<String>,
    nearest_port_km: Option<f64>,
}

pub async fn handle_classify(
    planner: &FreightPlanner,
    target: ClassifyTarget,
    format: OutputFormat,
) -> Result<String> {
    let location = match target {
        ClassifyTarget::Name(name) => planner
            .locate(&name)
            .await
            .with_context(|| format!("failed to resolve {name}"))?,
        ClassifyTarget::Coordinate { lat, lon } => {
            let coordinate = Coordinate::new(lat, lon)?;
            planner.classify(coordinate.to_string(), coordinate)
        }
    };

    let nearest = planner.catalog().nearest_port(&location.coordinate);
    let classification = Classification {
        name: location.name.clone(),
        coordinate: location.coordinate,
        kind: location.kind,
        nearest_port: nearest.map(|(port, _)| port.name.clone()),
        nearest_port_km: nearest.map(|(_, km)| km),
    };

    if format.is_json() {
        let json = serde_json::to_string_pretty(&classification)
            .context("failed to serialise classification")?;
        return Ok(format!("{json}\n"));
    }

    match (&classification.nearest_port, classification.nearest_port_km) {
        (Some(port), Some(km)) => Ok(format!(
            "{}: {} (nearest port {}, {:.1} km)\n",
            classification.name,
            classification.kind.label(),
            port,
            km
        )),
        _ => bail!("port catalog is empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use freightlane_lib::{CatalogResolver, GreatCircleProvider, PortCatalog};

    fn planner() -> FreightPlanner {
        let resolver = Arc::new(CatalogResolver::new(Arc::new(PortCatalog::builtin().clone())));
        let provider = Arc::new(GreatCircleProvider::default());
        FreightPlanner::new(resolver, provider.clone(), provider)
    }

    #[tokio::test]
    async fn port_name_classifies_as_port() {
        let text = handle_classify(
            &planner(),
            ClassifyTarget::Name("Santos".to_string()),
            OutputFormat::Text,
        )
        .await
        .unwrap();
        assert_eq!(text, "Santos: port (nearest port Santos, 0.0 km)\n");
    }

    #[tokio::test]
    async fn inland_coordinate_reports_nearest_port() {
        let text = handle_classify(
            &planner(),
            ClassifyTarget::Coordinate {
                lat: 4.711,
                lon: -74.072,
            },
            OutputFormat::Json,
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kind"], "inland");
        assert_eq!(value["nearest_port"], "Buenaventura");
    }
}
