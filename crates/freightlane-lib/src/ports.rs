//! Port catalog loading, nearest-port lookup, and port/inland classification.
//!
//! The built-in catalog is a static table of major container ports loaded
//! once per process and shared read-only across requests. Alternative
//! catalogs can be loaded from CSV files with `name,country,lat,lon` columns.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{great_circle_distance_km, Coordinate};

/// Minimum normalized Levenshtein similarity for a name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// `(name, country, lat, lon)` rows of the built-in catalog, in insertion order.
const BUILTIN_PORTS: &[(&str, &str, f64, f64)] = &[
    ("Shanghai", "China", 31.2, 121.8),
    ("Rotterdam", "Netherlands", 51.9, 4.5),
    ("Singapore", "Singapore", 1.3, 103.8),
    ("Los Angeles", "USA", 34.1, -118.2),
    ("Hamburg", "Germany", 53.6, 10.0),
    ("Buenaventura", "Colombia", 3.9, -77.0),
    ("Callao", "Peru", -12.1, -77.1),
    ("Antwerp", "Belgium", 51.2, 4.4),
    ("Hong Kong", "Hong Kong", 22.3, 114.2),
    ("Dubai", "UAE", 25.3, 55.3),
    ("New York", "USA", 40.7, -74.0),
    ("Yokohama", "Japan", 35.4, 139.6),
    ("Cape Town", "South Africa", -33.9, 18.4),
    ("Durban", "South Africa", -29.9, 31.0),
    ("Lagos", "Nigeria", 6.5, 3.4),
    ("Alexandria", "Egypt", 31.2, 29.9),
    ("Casablanca", "Morocco", 33.6, -7.6),
    ("Dakar", "Senegal", 14.7, -17.4),
    ("Mumbai", "India", 19.1, 72.8),
    ("Chennai", "India", 13.1, 80.3),
    ("Sydney", "Australia", -33.9, 151.2),
    ("Vancouver", "Canada", 49.3, -123.1),
    ("Santos", "Brazil", -23.9, -46.3),
];

static BUILTIN_CATALOG: Lazy<PortCatalog> = Lazy::new(|| {
    let entries = BUILTIN_PORTS
        .iter()
        .map(|&(name, country, lat, lon)| PortCatalogEntry {
            name: name.to_string(),
            country: country.to_string(),
            coordinate: Coordinate { lat, lon },
        })
        .collect();
    PortCatalog::from_entries_unchecked(entries)
});

/// A seaport known to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortCatalogEntry {
    pub name: String,
    pub country: String,
    pub coordinate: Coordinate,
}

/// Classification of a location relative to the port catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Port,
    Inland,
}

impl LocationKind {
    pub fn label(self) -> &'static str {
        match self {
            LocationKind::Port => "port",
            LocationKind::Inland => "inland",
        }
    }
}

/// A named, resolved, and classified endpoint of a planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub coordinate: Coordinate,
    pub kind: LocationKind,
}

impl Location {
    /// Classify `coordinate` against `catalog` and wrap it as a location.
    pub fn classified(
        name: impl Into<String>,
        coordinate: Coordinate,
        catalog: &PortCatalog,
        threshold_km: f64,
    ) -> Self {
        Self {
            name: name.into(),
            coordinate: coordinate.normalized(),
            kind: catalog.classify(&coordinate, threshold_km),
        }
    }

    pub fn is_port(&self) -> bool {
        self.kind == LocationKind::Port
    }
}

/// Read-only collection of seaports.
#[derive(Debug, Clone)]
pub struct PortCatalog {
    entries: Vec<PortCatalogEntry>,
    by_name: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl PortCatalog {
    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static PortCatalog {
        &BUILTIN_CATALOG
    }

    /// Build a catalog from entries, rejecting empty lists and duplicate names.
    pub fn from_entries(entries: Vec<PortCatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::PortCatalog {
                message: "catalog contains no ports".to_string(),
            });
        }
        let mut seen = HashMap::new();
        for entry in &entries {
            Coordinate::new(entry.coordinate.lat, entry.coordinate.lon)?;
            if seen.insert(normalize_name(&entry.name), ()).is_some() {
                return Err(Error::PortCatalog {
                    message: format!("duplicate port name: {}", entry.name),
                });
            }
        }
        Ok(Self::from_entries_unchecked(entries))
    }

    fn from_entries_unchecked(entries: Vec<PortCatalogEntry>) -> Self {
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (normalize_name(&entry.name), i))
            .collect();
        Self {
            entries,
            by_name,
            source: None,
        }
    }

    /// Load a catalog from a CSV file with `name,country,lat,lon` columns.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load a catalog from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows = read_named_points(reader, true)?;
        let entries = rows
            .into_iter()
            .map(|row| PortCatalogEntry {
                name: row.name,
                country: row.country.unwrap_or_default(),
                coordinate: row.coordinate,
            })
            .collect();
        Self::from_entries(entries)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[PortCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source file, if the catalog was loaded from disk.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Look up a port by name, ignoring case and treating `_` like a space.
    pub fn find(&self, name: &str) -> Option<&PortCatalogEntry> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&index| &self.entries[index])
    }

    /// Port names similar to `name`, most similar first.
    pub fn suggestions(&self, name: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(name, self.entries.iter().map(|e| e.name.as_str()), limit)
    }

    /// Nearest port to `coordinate` and its great-circle distance in km.
    ///
    /// Ties keep the entry that appears first in the catalog.
    pub fn nearest_port(&self, coordinate: &Coordinate) -> Option<(&PortCatalogEntry, f64)> {
        self.nearest_matching(coordinate, |_| true)
    }

    /// Nearest port that is not located in `country`.
    pub fn nearest_port_excluding_country(
        &self,
        coordinate: &Coordinate,
        country: &str,
    ) -> Option<(&PortCatalogEntry, f64)> {
        self.nearest_matching(coordinate, |entry| {
            !entry.country.eq_ignore_ascii_case(country)
        })
    }

    fn nearest_matching<F>(
        &self,
        coordinate: &Coordinate,
        filter: F,
    ) -> Option<(&PortCatalogEntry, f64)>
    where
        F: Fn(&PortCatalogEntry) -> bool,
    {
        let mut best: Option<(&PortCatalogEntry, f64)> = None;
        for entry in self.entries.iter().filter(|e| filter(e)) {
            let distance = great_circle_distance_km(coordinate, &entry.coordinate);
            match best {
                Some((_, current)) if distance >= current => {}
                _ => best = Some((entry, distance)),
            }
        }
        best
    }

    /// A coordinate is a port iff its nearest catalog entry is within `threshold_km`.
    pub fn classify(&self, coordinate: &Coordinate, threshold_km: f64) -> LocationKind {
        match self.nearest_port(coordinate) {
            Some((_, distance)) if distance <= threshold_km => LocationKind::Port,
            _ => LocationKind::Inland,
        }
    }
}

/// One row of a named-point CSV file (port catalog or place gazetteer).
#[derive(Debug, Clone)]
pub(crate) struct NamedPoint {
    pub name: String,
    pub country: Option<String>,
    pub coordinate: Coordinate,
}

/// Parse `name[,country],lat,lon` rows with tolerant header matching.
pub(crate) fn read_named_points<R: Read>(reader: R, require_country: bool) -> Result<Vec<NamedPoint>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let normalize = |s: &str| {
        s.to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
    };
    let normalized_headers: Vec<String> = headers.iter().map(&normalize).collect();

    let synonyms: &[(&str, &[&str])] = &[
        ("name", &["name", "port", "portname", "place", "placename"]),
        ("country", &["country", "countryname", "nation"]),
        ("lat", &["lat", "latitude"]),
        ("lon", &["lon", "lng", "long", "longitude"]),
    ];

    let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
    for (canon, alts) in synonyms {
        if let Some(i) = alts
            .iter()
            .find_map(|alt| normalized_headers.iter().position(|h| h == alt))
        {
            index_map.insert(*canon, i);
        }
    }

    let mut required = vec!["name", "lat", "lon"];
    if require_country {
        required.push("country");
    }
    let missing: Vec<&str> = required
        .into_iter()
        .filter(|c| !index_map.contains_key(c))
        .collect();
    if !missing.is_empty() {
        return Err(Error::PortCatalog {
            message: format!(
                "missing required columns: {}. Available: {}",
                missing.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    let mut rows = Vec::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = offset + 2;
        let get = |field: &str| -> Option<String> {
            index_map
                .get(field)
                .and_then(|&i| record.get(i))
                .map(|s| s.trim().to_string())
        };

        let name = get("name").unwrap_or_default();
        if name.is_empty() {
            return Err(Error::PortCatalog {
                message: format!("empty name at row {}", row),
            });
        }
        let parse = |field: &str| -> Result<f64> {
            get(field)
                .unwrap_or_default()
                .parse::<f64>()
                .map_err(|e| Error::PortCatalog {
                    message: format!("invalid {} for '{}' at row {}: {}", field, name, row, e),
                })
        };
        let coordinate = Coordinate::new(parse("lat")?, parse("lon")?)?;

        rows.push(NamedPoint {
            name: name.clone(),
            country: get("country").filter(|c| !c.is_empty()),
            coordinate,
        });
    }
    Ok(rows)
}

/// Case-insensitive key for name lookups.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace('_', " ")
}

/// Names from `candidates` similar to `query`, best match first.
pub(crate) fn fuzzy_matches<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = normalize_name(query);
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            (
                strsim::normalized_levenshtein(&query, &normalize_name(candidate)),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn builtin_catalog_preserves_insertion_order() {
        let catalog = PortCatalog::builtin();
        assert_eq!(catalog.len(), 23);
        assert_eq!(catalog.entries()[0].name, "Shanghai");
        assert_eq!(catalog.entries()[22].name, "Santos");
    }

    #[test]
    fn find_ignores_case_and_underscores() {
        let catalog = PortCatalog::builtin();
        assert_eq!(catalog.find("los_angeles").unwrap().name, "Los Angeles");
        assert_eq!(catalog.find("  HONG KONG ").unwrap().country, "Hong Kong");
        assert!(catalog.find("Bogota").is_none());
    }

    #[test]
    fn nearest_port_for_inland_colombia_is_buenaventura() {
        let bogota = Coordinate { lat: 4.71, lon: -74.07 };
        let (port, distance) = PortCatalog::builtin().nearest_port(&bogota).unwrap();
        assert_eq!(port.name, "Buenaventura");
        assert!(distance > 50.0);
    }

    #[test]
    fn nearest_port_ties_keep_first_entry() {
        let entries = vec![
            PortCatalogEntry {
                name: "West".to_string(),
                country: "A".to_string(),
                coordinate: Coordinate { lat: 0.0, lon: -1.0 },
            },
            PortCatalogEntry {
                name: "East".to_string(),
                country: "B".to_string(),
                coordinate: Coordinate { lat: 0.0, lon: 1.0 },
            },
        ];
        let catalog = PortCatalog::from_entries(entries).unwrap();
        let (port, _) = catalog
            .nearest_port(&Coordinate { lat: 0.0, lon: 0.0 })
            .unwrap();
        assert_eq!(port.name, "West");
    }

    #[test]
    fn classify_respects_threshold() {
        let catalog = PortCatalog::builtin();
        let shanghai_city = Coordinate { lat: 31.23, lon: 121.47 };
        assert_eq!(catalog.classify(&shanghai_city, 50.0), LocationKind::Port);
        assert_eq!(catalog.classify(&shanghai_city, 10.0), LocationKind::Inland);
    }

    #[test]
    fn nearest_port_excluding_country_skips_country() {
        let catalog = PortCatalog::builtin();
        let near_rotterdam = Coordinate { lat: 51.9, lon: 4.6 };
        let (port, _) = catalog
            .nearest_port_excluding_country(&near_rotterdam, "netherlands")
            .unwrap();
        assert_eq!(port.name, "Antwerp");
    }

    #[test]
    fn from_reader_accepts_header_synonyms() {
        let csv = "Port Name,Country,Latitude,Longitude\nValparaiso,Chile,-33.04,-71.63\n";
        let catalog = PortCatalog::from_reader(Cursor::new(csv)).expect("parses");
        let port = catalog.find("valparaiso").expect("present");
        assert_eq!(port.country, "Chile");
        assert_eq!(port.coordinate.lat, -33.04);
    }

    #[test]
    fn from_reader_rejects_duplicates_and_missing_columns() {
        let dup = "name,country,lat,lon\nA,X,0,0\na,Y,1,1\n";
        assert!(matches!(
            PortCatalog::from_reader(Cursor::new(dup)),
            Err(Error::PortCatalog { .. })
        ));

        let missing = "name,lat,lon\nA,0,0\n";
        let err = PortCatalog::from_reader(Cursor::new(missing)).unwrap_err();
        assert!(err.to_string().contains("country"));
    }

    #[test]
    fn from_reader_rejects_out_of_range_latitude() {
        let csv = "name,country,lat,lon\nNowhere,X,95,0\n";
        assert!(matches!(
            PortCatalog::from_reader(Cursor::new(csv)),
            Err(Error::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn suggestions_rank_similar_names() {
        let suggestions = PortCatalog::builtin().suggestions("Rotterdm", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("Rotterdam"));
        assert!(PortCatalog::builtin().suggestions("zzzzzz", 3).is_empty());
    }
}
