//! Route command handler for planning a journey between two named places.

use anyhow::{Context, Result};
use tracing::debug;

use freightlane_lib::{validate, FreightPlanner};

use crate::output::{render_route, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Origin place or port name.
    pub from: String,
    /// Destination place or port name.
    pub to: String,
    /// Cargo weight in kilograms. Accepted for parity with the HTTP API; not used in planning.
    pub cargo_weight_kg: Option<f64>,
}

/// Plan, validate and render a route.
pub async fn handle_route(
    planner: &FreightPlanner,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<String> {
    if let Some(weight) = args.cargo_weight_kg {
        debug!(cargo_weight_kg = weight, "cargo weight does not affect routing");
    }

    let route = planner
        .plan_route(&args.from, &args.to)
        .await
        .with_context(|| format!("failed to plan route from {} to {}", args.from, args.to))?;
    let report = validate(&route);
    render_route(&route, &report, format)
}
