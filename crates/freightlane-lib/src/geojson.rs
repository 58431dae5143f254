//! GeoJSON export of assembled routes.

use serde::{Deserialize, Serialize};

use crate::antimeridian::split_at_antimeridian;
use crate::route::{Route, SegmentMode};

/// A GeoJSON `FeatureCollection` of route line strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: LineString,
    pub properties: FeatureProperties,
}

/// `LineString` geometry with `[lon, lat]` positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub segment_index: usize,
    pub sub_segment_index: usize,
    pub mode: SegmentMode,
    /// Distance of the owning segment, repeated on each of its pieces.
    pub distance_km: f64,
    /// Vertices in this feature's line.
    pub waypoint_count: usize,
}

/// Export `route` as dateline-safe GeoJSON.
///
/// Each segment becomes one feature, or several when its polyline crosses
/// the antimeridian. Features appear in segment order, then piece order.
pub fn to_geojson(route: &Route) -> FeatureCollection {
    let mut features = Vec::new();
    for (segment_index, segment) in route.segments.iter().enumerate() {
        for (sub_segment_index, piece) in split_at_antimeridian(&segment.waypoints)
            .into_iter()
            .enumerate()
        {
            features.push(Feature {
                kind: "Feature".to_string(),
                properties: FeatureProperties {
                    segment_index,
                    sub_segment_index,
                    mode: segment.mode,
                    distance_km: segment.distance_km,
                    waypoint_count: piece.len(),
                },
                geometry: LineString {
                    kind: "LineString".to_string(),
                    coordinates: piece.into_iter().map(|c| c.to_lon_lat()).collect(),
                },
            });
        }
    }
    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::route::{RouteKind, RouteSegment, SegmentSource};

    fn segment(mode: SegmentMode, waypoints: Vec<Coordinate>, distance_km: f64) -> RouteSegment {
        RouteSegment {
            mode,
            origin: waypoints[0],
            destination: waypoints[waypoints.len() - 1],
            waypoints,
            description: String::new(),
            distance_km,
            source: SegmentSource::Provider {
                name: "test".to_string(),
            },
        }
    }

    #[test]
    fn pacific_crossing_becomes_two_features() {
        let sea = segment(
            SegmentMode::Sea,
            vec![
                Coordinate { lat: 31.2, lon: 121.8 },
                Coordinate { lat: 40.0, lon: 170.0 },
                Coordinate { lat: 40.0, lon: -170.0 },
                Coordinate { lat: 34.1, lon: -118.2 },
            ],
            10_500.0,
        );
        let land = segment(
            SegmentMode::Land,
            vec![
                Coordinate { lat: 34.1, lon: -118.2 },
                Coordinate { lat: 36.17, lon: -115.14 },
            ],
            370.0,
        );
        let route = Route::new(RouteKind::PortToInland, vec![sea, land], "test");

        let collection = to_geojson(&route);
        assert_eq!(collection.kind, "FeatureCollection");
        assert_eq!(collection.features.len(), 3);

        let props: Vec<(usize, usize)> = collection
            .features
            .iter()
            .map(|f| (f.properties.segment_index, f.properties.sub_segment_index))
            .collect();
        assert_eq!(props, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(collection.features[0].geometry.coordinates[0], [121.8, 31.2]);
        assert_eq!(collection.features[0].properties.waypoint_count, 3);
        assert_eq!(collection.features[1].properties.distance_km, 10_500.0);
    }

    #[test]
    fn properties_serialize_in_camel_case() {
        let route = Route::new(
            RouteKind::PortToPort,
            vec![segment(
                SegmentMode::Sea,
                vec![Coordinate { lat: 0.0, lon: 0.0 }, Coordinate { lat: 0.0, lon: 1.0 }],
                111.0,
            )],
            "test",
        );
        let value = serde_json::to_value(to_geojson(&route)).unwrap();
        let properties = &value["features"][0]["properties"];
        assert_eq!(properties["segmentIndex"], 0);
        assert_eq!(properties["subSegmentIndex"], 0);
        assert_eq!(properties["mode"], "sea");
        assert_eq!(properties["waypointCount"], 2);
        assert_eq!(value["features"][0]["geometry"]["type"], "LineString");
    }
}
