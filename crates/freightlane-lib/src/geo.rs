//! Geographic primitives: coordinates, longitude normalization, and
//! great-circle distances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Tolerance used when comparing coordinates for equality.
pub const COORDINATE_EPSILON: f64 = 1e-9;

/// A point on the Earth's surface in decimal degrees.
///
/// Longitudes are accepted in any range on input and normalized into
/// `[-180, 180]` before any geometric operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// Rejects non-finite values and latitudes outside `[-90, 90]`. The
    /// longitude is kept as given; use [`Coordinate::normalized`] to wrap it.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Copy of this coordinate with its longitude wrapped into `[-180, 180]`.
    pub fn normalized(self) -> Self {
        Self {
            lat: self.lat,
            lon: normalize_longitude(self.lon),
        }
    }

    /// Whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Approximate equality after longitude normalization.
    pub fn approx_eq(&self, other: &Coordinate, tolerance: f64) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        let dlon = (a.lon - b.lon).abs();
        (a.lat - b.lat).abs() <= tolerance && (dlon <= tolerance || (360.0 - dlon) <= tolerance)
    }

    /// `[lon, lat]` pair in GeoJSON axis order.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Wrap a longitude into `[-180, 180]`.
///
/// Equivalent to repeatedly adding or subtracting 360 until the value is in
/// range, so `540` maps to `180` and `-540` maps to `-180`. Non-finite input
/// is returned unchanged.
pub fn normalize_longitude(lon: f64) -> f64 {
    if !lon.is_finite() {
        return lon;
    }
    if lon > 180.0 {
        lon - 360.0 * ((lon - 180.0) / 360.0).ceil()
    } else if lon < -180.0 {
        lon + 360.0 * ((-180.0 - lon) / 360.0).ceil()
    } else {
        lon
    }
}

/// Haversine distance between two coordinates in kilometres.
pub fn great_circle_distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let a = a.normalized();
    let b = b.normalized();
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Sum of great-circle distances between consecutive points of a polyline.
pub fn polyline_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| great_circle_distance_km(&pair[0], &pair[1]))
        .sum()
}

/// Points along the great-circle arc from `a` to `b`, inclusive of both ends.
///
/// `intermediate` extra vertices are inserted between the endpoints using
/// spherical linear interpolation. Longitudes of the result are normalized.
///
/// Antipodal endpoints have no unique arc; the path then runs through the
/// equator point 90 degrees east of `a`, which lies on a great circle
/// through both ends.
pub fn densify_great_circle(a: &Coordinate, b: &Coordinate, intermediate: usize) -> Vec<Coordinate> {
    let start = a.normalized();
    let end = b.normalized();
    let angular = great_circle_distance_km(&start, &end) / EARTH_RADIUS_KM;
    let sin_total = angular.sin();

    if angular > COORDINATE_EPSILON && sin_total < COORDINATE_EPSILON && intermediate > 0 {
        let pivot = Coordinate {
            lat: 0.0,
            lon: normalize_longitude(start.lon + 90.0),
        };
        let before = (intermediate - 1) / 2;
        let mut points = densify_great_circle(&start, &pivot, before);
        points.extend(
            densify_great_circle(&pivot, &end, intermediate - 1 - before)
                .into_iter()
                .skip(1),
        );
        return points;
    }

    let mut points = Vec::with_capacity(intermediate + 2);
    points.push(start);
    if angular > COORDINATE_EPSILON && sin_total >= COORDINATE_EPSILON {
        let (x1, y1, z1) = to_cartesian(&start);
        let (x2, y2, z2) = to_cartesian(&end);
        let steps = intermediate + 1;
        for step in 1..steps {
            let f = step as f64 / steps as f64;
            let wa = ((1.0 - f) * angular).sin() / sin_total;
            let wb = (f * angular).sin() / sin_total;
            let x = wa * x1 + wb * x2;
            let y = wa * y1 + wb * y2;
            let z = wa * z1 + wb * z2;
            let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
            let lon = y.atan2(x).to_degrees();
            points.push(Coordinate {
                lat,
                lon: normalize_longitude(lon),
            });
        }
    }
    points.push(end);
    points
}

fn to_cartesian(c: &Coordinate) -> (f64, f64, f64) {
    let lat = c.lat.to_radians();
    let lon = c.lon.to_radians();
    (lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn normalize_longitude_wraps_into_range() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert!((normalize_longitude(181.0) - -179.0).abs() < 1e-12);
        assert!((normalize_longitude(-181.0) - 179.0).abs() < 1e-12);
        assert!((normalize_longitude(540.0) - 180.0).abs() < 1e-12);
        assert!((normalize_longitude(-540.0) - -180.0).abs() < 1e-12);
        assert!((normalize_longitude(725.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn coordinate_new_rejects_invalid_values() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        let c = Coordinate::new(10.0, 370.0).expect("wide longitude accepted");
        assert_eq!(c.normalized().lon, 10.0);
    }

    #[test]
    fn great_circle_distance_matches_known_value() {
        // One degree of latitude along a meridian.
        let d = great_circle_distance_km(&coord(0.0, 0.0), &coord(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn great_circle_distance_is_short_across_dateline() {
        let d = great_circle_distance_km(&coord(0.0, 179.5), &coord(0.0, -179.5));
        assert!(d < 112.0, "got {d}");
    }

    #[test]
    fn polyline_length_sums_pairs() {
        let points = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(2.0, 0.0)];
        let single = great_circle_distance_km(&points[0], &points[2]);
        assert!((polyline_length_km(&points) - single).abs() < 1e-6);
        assert_eq!(polyline_length_km(&points[..1]), 0.0);
    }

    #[test]
    fn densify_keeps_endpoints_and_length() {
        let a = coord(31.2, 121.8);
        let b = coord(34.1, -118.2);
        let points = densify_great_circle(&a, &b, 8);
        assert_eq!(points.len(), 10);
        assert!(points[0].approx_eq(&a, 1e-9));
        assert!(points[9].approx_eq(&b, 1e-9));
        let direct = great_circle_distance_km(&a, &b);
        assert!((polyline_length_km(&points) - direct).abs() < 1e-3);
    }

    #[test]
    fn densify_antipodal_leg_follows_a_half_circle() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let points = densify_great_circle(&a, &b, 6);
        assert_eq!(points.len(), 8);
        assert!(points[0].approx_eq(&a, 1e-9));
        assert!(points[7].approx_eq(&b, 1e-9));
        assert!(points.iter().any(|p| p.approx_eq(&coord(0.0, 90.0), 1e-9)));
        let half_circle = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((polyline_length_km(&points) - half_circle).abs() < 1e-3);

        assert_eq!(densify_great_circle(&a, &b, 0).len(), 2);
    }

    #[test]
    fn densify_degenerate_leg_has_two_points() {
        let a = coord(10.0, 10.0);
        assert_eq!(densify_great_circle(&a, &a, 5).len(), 2);
    }
}
