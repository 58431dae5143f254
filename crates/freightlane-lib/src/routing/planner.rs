//! Segmentation decision table.
//!
//! Turns the port/inland classification of both endpoints into an ordered
//! list of abstract [`Leg`] requests. Nothing here calls a provider.

use serde::Serialize;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::geo::{great_circle_distance_km, Coordinate, COORDINATE_EPSILON};
use crate::ports::{Location, LocationKind, PortCatalog, PortCatalogEntry};
use crate::route::{RouteKind, SegmentMode};

/// One unresolved sea or land request emitted by the planner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub mode: SegmentMode,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub origin_label: String,
    pub destination_label: String,
}

impl Leg {
    fn new(mode: SegmentMode, from: (&str, Coordinate), to: (&str, Coordinate)) -> Self {
        Self {
            mode,
            origin: from.1.normalized(),
            destination: to.1.normalized(),
            origin_label: from.0.to_string(),
            destination_label: to.0.to_string(),
        }
    }

    /// Human-readable label such as `Sea: Shanghai -> Buenaventura`.
    pub fn description(&self) -> String {
        let mode = match self.mode {
            SegmentMode::Sea => "Sea",
            SegmentMode::Land => "Land",
        };
        format!("{}: {} -> {}", mode, self.origin_label, self.destination_label)
    }

    /// Whether the leg starts and ends at the same coordinate.
    pub fn is_degenerate(&self) -> bool {
        self.origin.approx_eq(&self.destination, COORDINATE_EPSILON)
    }
}

/// Ordered legs plus the plan shape they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationPlan {
    pub kind: RouteKind,
    pub legs: Vec<Leg>,
    pub description: String,
}

impl SegmentationPlan {
    pub fn modes(&self) -> Vec<SegmentMode> {
        self.legs.iter().map(|leg| leg.mode).collect()
    }
}

/// Build the leg list for a classified origin and destination.
///
/// | Origin | Destination | Legs |
/// |---|---|---|
/// | Port | Port | sea |
/// | Port | Inland | sea, land |
/// | Inland | Port | land, sea |
/// | Inland | Inland | land, sea, land (or one land leg when collapsed) |
pub fn plan_legs(
    origin: &Location,
    destination: &Location,
    catalog: &PortCatalog,
    config: &PlannerConfig,
) -> SegmentationPlan {
    let from = (origin.name.as_str(), origin.coordinate);
    let to = (destination.name.as_str(), destination.coordinate);

    let plan = match (origin.kind, destination.kind) {
        (LocationKind::Port, LocationKind::Port) => SegmentationPlan {
            kind: RouteKind::PortToPort,
            legs: vec![Leg::new(SegmentMode::Sea, from, to)],
            description: format!(
                "{}: {} -> {}",
                RouteKind::PortToPort.label(),
                origin.name,
                destination.name
            ),
        },
        (LocationKind::Port, LocationKind::Inland) => {
            let Some((port, _)) = catalog.nearest_port(&destination.coordinate) else {
                return land_only(origin, destination);
            };
            let via = (port.name.as_str(), port.coordinate);
            SegmentationPlan {
                kind: RouteKind::PortToInland,
                legs: vec![
                    Leg::new(SegmentMode::Sea, from, via),
                    Leg::new(SegmentMode::Land, via, to),
                ],
                description: format!(
                    "{}: {} -> {} via {}",
                    RouteKind::PortToInland.label(),
                    origin.name,
                    destination.name,
                    port.name
                ),
            }
        }
        (LocationKind::Inland, LocationKind::Port) => {
            let Some((port, _)) = catalog.nearest_port(&origin.coordinate) else {
                return land_only(origin, destination);
            };
            let via = (port.name.as_str(), port.coordinate);
            SegmentationPlan {
                kind: RouteKind::InlandToPort,
                legs: vec![
                    Leg::new(SegmentMode::Land, from, via),
                    Leg::new(SegmentMode::Sea, via, to),
                ],
                description: format!(
                    "{}: {} -> {} via {}",
                    RouteKind::InlandToPort.label(),
                    origin.name,
                    destination.name,
                    port.name
                ),
            }
        }
        (LocationKind::Inland, LocationKind::Inland) => {
            plan_inland_to_inland(origin, destination, catalog, config)
        }
    };

    // A port endpoint can also be the inland endpoint's nearest port; the
    // table still emits its sea leg, with zero length.
    for leg in plan.legs.iter().filter(|leg| leg.is_degenerate()) {
        debug!(leg = %leg.description(), "zero-length leg kept in plan");
    }
    plan
}

fn plan_inland_to_inland(
    origin: &Location,
    destination: &Location,
    catalog: &PortCatalog,
    config: &PlannerConfig,
) -> SegmentationPlan {
    let (Some(origin_port), Some(destination_port)) = (
        catalog.nearest_port(&origin.coordinate),
        catalog.nearest_port(&destination.coordinate),
    ) else {
        return land_only(origin, destination);
    };

    if let Some(reason) = collapse_reason(origin, destination, origin_port, destination_port, config) {
        debug!(
            origin = %origin.name,
            destination = %destination.name,
            reason,
            "collapsing inland route to a single land leg"
        );
        return land_only(origin, destination);
    }

    let (origin_port, _) = origin_port;
    let (mut destination_port, _) = destination_port;

    if origin_port.country.eq_ignore_ascii_case(&destination_port.country) {
        if let Some((foreign, distance)) =
            catalog.nearest_port_excluding_country(&destination.coordinate, &origin_port.country)
        {
            if distance <= config.domestic_haul_max_km {
                debug!(
                    replaced = %destination_port.name,
                    port = %foreign.name,
                    distance_km = distance,
                    "re-selecting destination port outside origin country"
                );
                destination_port = foreign;
            }
        }
    }

    let from = (origin.name.as_str(), origin.coordinate);
    let to = (destination.name.as_str(), destination.coordinate);
    let load = (origin_port.name.as_str(), origin_port.coordinate);
    let discharge = (destination_port.name.as_str(), destination_port.coordinate);

    SegmentationPlan {
        kind: RouteKind::InlandToInland,
        legs: vec![
            Leg::new(SegmentMode::Land, from, load),
            Leg::new(SegmentMode::Sea, load, discharge),
            Leg::new(SegmentMode::Land, discharge, to),
        ],
        description: format!(
            "{}: {} -> {} via {} and {}",
            RouteKind::InlandToInland.label(),
            origin.name,
            destination.name,
            origin_port.name,
            destination_port.name
        ),
    }
}

/// Why an inland/inland plan degenerates into a direct land haul, if it does.
fn collapse_reason(
    origin: &Location,
    destination: &Location,
    (origin_port, origin_km): (&PortCatalogEntry, f64),
    (destination_port, destination_km): (&PortCatalogEntry, f64),
    config: &PlannerConfig,
) -> Option<&'static str> {
    if origin_port.name == destination_port.name {
        return Some("shared nearest port");
    }
    if origin_km < config.collapse_land_leg_km && destination_km < config.collapse_land_leg_km {
        return Some("short approach legs");
    }
    if config.collapse_same_country
        && origin_port.country.eq_ignore_ascii_case(&destination_port.country)
        && great_circle_distance_km(&origin.coordinate, &destination.coordinate)
            <= config.domestic_haul_max_km
    {
        return Some("domestic haul");
    }
    None
}

fn land_only(origin: &Location, destination: &Location) -> SegmentationPlan {
    SegmentationPlan {
        kind: RouteKind::LandOnly,
        legs: vec![Leg::new(
            SegmentMode::Land,
            (origin.name.as_str(), origin.coordinate),
            (destination.name.as_str(), destination.coordinate),
        )],
        description: format!(
            "{}: {} -> {}",
            RouteKind::LandOnly.label(),
            origin.name,
            destination.name
        ),
    }
}
