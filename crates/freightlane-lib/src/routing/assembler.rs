//! Concurrent leg resolution with straight-line fallback.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::great_circle_distance_km;
use crate::providers::{LandRouteProvider, LegGeometry, SeaRouteProvider};
use crate::route::{Route, RouteSegment, SegmentMode, SegmentSource};

use super::planner::{Leg, SegmentationPlan};

/// Endpoint drift, in degrees, above which provider geometry is re-anchored.
const ENDPOINT_DRIFT_DEG: f64 = 0.05;

/// Resolve every leg of `plan` through its provider and stitch the result.
///
/// Legs are resolved concurrently, one task per leg, each bounded by
/// `timeout`. A failed, timed-out or panicked provider call degrades only its
/// own leg to a straight line. Segments keep the plan's leg order regardless
/// of completion order. Dropping the returned future aborts all in-flight
/// provider calls.
pub async fn assemble_route(
    plan: SegmentationPlan,
    sea: Arc<dyn SeaRouteProvider>,
    land: Arc<dyn LandRouteProvider>,
    timeout: Duration,
) -> Result<Route> {
    if plan.legs.is_empty() {
        return Err(Error::EmptyPlan);
    }

    let mut tasks = JoinSet::new();
    for (index, leg) in plan.legs.iter().cloned().enumerate() {
        let sea = Arc::clone(&sea);
        let land = Arc::clone(&land);
        tasks.spawn(async move {
            let segment = resolve_leg(index, leg, sea, land, timeout).await;
            (index, segment)
        });
    }

    let mut slots: Vec<Option<RouteSegment>> = vec![None; plan.legs.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, segment)) => slots[index] = Some(segment),
            Err(err) => warn!(error = %err, "leg resolution task failed"),
        }
    }

    let segments = slots
        .into_iter()
        .zip(&plan.legs)
        .enumerate()
        .map(|(index, (slot, leg))| {
            slot.unwrap_or_else(|| fallback_segment(index, leg, "resolution task aborted".to_string()))
        })
        .collect::<Vec<_>>();

    let route = Route::new(plan.kind, segments, plan.description);
    debug!(
        kind = route.kind.slug(),
        segments = route.segments.len(),
        total_distance_km = route.total_distance_km,
        fallbacks = route.fallback_count(),
        "route assembled"
    );
    Ok(route)
}

async fn resolve_leg(
    index: usize,
    leg: Leg,
    sea: Arc<dyn SeaRouteProvider>,
    land: Arc<dyn LandRouteProvider>,
    timeout: Duration,
) -> RouteSegment {
    let (provider, call) = match leg.mode {
        SegmentMode::Sea => (sea.name().to_string(), sea.route(&leg.origin, &leg.destination)),
        SegmentMode::Land => (land.name().to_string(), land.route(&leg.origin, &leg.destination)),
    };

    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(geometry)) => geometry.validate(&provider),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(Error::routing_unavailable(
            provider.as_str(),
            format!("timed out after {}ms", timeout.as_millis()),
        )),
    };

    match outcome {
        Ok(geometry) => provider_segment(index, &leg, provider, geometry),
        Err(err) => fallback_segment(index, &leg, err.to_string()),
    }
}

fn provider_segment(index: usize, leg: &Leg, provider: String, geometry: LegGeometry) -> RouteSegment {
    let geometry = anchor_endpoints(index, leg, &provider, geometry);
    RouteSegment {
        mode: leg.mode,
        origin: leg.origin,
        destination: leg.destination,
        waypoints: geometry.waypoints,
        description: leg.description(),
        distance_km: geometry.distance_km,
        source: SegmentSource::Provider { name: provider },
    }
}

/// Pin provider geometry to the requested leg endpoints.
///
/// Engines snap endpoints onto their own network (sea graph, nearest road).
/// A drifted end gets a straight connector back to the requested coordinate
/// and its length is added to the leg distance.
fn anchor_endpoints(index: usize, leg: &Leg, provider: &str, geometry: LegGeometry) -> LegGeometry {
    let LegGeometry {
        mut waypoints,
        mut distance_km,
    } = geometry;

    if let Some(first) = waypoints.first().copied() {
        if !first.approx_eq(&leg.origin, ENDPOINT_DRIFT_DEG) {
            let connector = great_circle_distance_km(&leg.origin, &first);
            debug!(leg = index, provider, connector_km = connector, "anchoring drifted leg start");
            waypoints.insert(0, leg.origin);
            distance_km += connector;
        }
    }
    if let Some(last) = waypoints.last().copied() {
        if !last.approx_eq(&leg.destination, ENDPOINT_DRIFT_DEG) {
            let connector = great_circle_distance_km(&last, &leg.destination);
            debug!(leg = index, provider, connector_km = connector, "anchoring drifted leg end");
            waypoints.push(leg.destination);
            distance_km += connector;
        }
    }

    LegGeometry {
        waypoints,
        distance_km,
    }
}

fn fallback_segment(index: usize, leg: &Leg, reason: String) -> RouteSegment {
    warn!(
        leg = index,
        mode = %leg.mode,
        reason = %reason,
        "routing provider failed, using straight-line segment"
    );
    let geometry = LegGeometry::straight_line(&leg.origin, &leg.destination);
    RouteSegment {
        mode: leg.mode,
        origin: leg.origin,
        destination: leg.destination,
        waypoints: geometry.waypoints,
        description: leg.description(),
        distance_km: geometry.distance_km,
        source: SegmentSource::Fallback { reason },
    }
}
