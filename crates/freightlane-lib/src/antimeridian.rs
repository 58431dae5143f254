//! Dateline-safe polyline handling for map rendering.
//!
//! Polylines are never shifted into a continuous out-of-range longitude
//! space. Instead, every pair of consecutive vertices whose longitude jump
//! exceeds 180 degrees is treated as an antimeridian crossing and the line is
//! cut there, with a boundary vertex at +/-180 on both sides of the cut.

use crate::geo::{normalize_longitude, Coordinate};

/// Copy of `points` with every longitude wrapped into `[-180, 180]`.
pub fn normalize_polyline(points: &[Coordinate]) -> Vec<Coordinate> {
    points.iter().map(|c| c.normalized()).collect()
}

/// Whether any consecutive pair of normalized vertices jumps more than 180 degrees.
pub fn crosses_antimeridian(points: &[Coordinate]) -> bool {
    points.windows(2).any(|pair| {
        (normalize_longitude(pair[1].lon) - normalize_longitude(pair[0].lon)).abs() > 180.0
    })
}

/// Split a polyline into pieces that never jump across the antimeridian.
///
/// The first vertex of the first piece and the last vertex of the last piece
/// are the (normalized) first and last input vertices. Each piece produced
/// by a cut has at least two vertices. Empty input yields no pieces.
pub fn split_at_antimeridian(points: &[Coordinate]) -> Vec<Vec<Coordinate>> {
    let normalized = normalize_polyline(points);
    let Some((&first, rest)) = normalized.split_first() else {
        return Vec::new();
    };

    let mut pieces = Vec::new();
    let mut current = vec![first];
    let mut previous = first;

    for &point in rest {
        let delta = point.lon - previous.lon;
        if delta.abs() > 180.0 {
            // Eastbound crossings wrap from +180 to -180, westbound the reverse.
            let boundary = if delta < 0.0 { 180.0 } else { -180.0 };
            let unwrapped = point.lon + 2.0 * boundary;
            let span = unwrapped - previous.lon;
            let t = if span.abs() > f64::EPSILON {
                ((boundary - previous.lon) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lat = previous.lat + t * (point.lat - previous.lat);

            current.push(Coordinate { lat, lon: boundary });
            pieces.push(std::mem::take(&mut current));
            current.push(Coordinate { lat, lon: -boundary });
        }
        current.push(point);
        previous = point;
    }

    pieces.push(current);
    pieces
}
