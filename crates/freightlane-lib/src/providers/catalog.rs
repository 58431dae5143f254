use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::ports::{fuzzy_matches, normalize_name, read_named_points, PortCatalog};

use super::LocationResolver;

/// Maximum number of suggestions attached to a not-found error.
const MAX_SUGGESTIONS: usize = 3;

/// Offline resolver backed by the port catalog and an optional gazetteer.
///
/// Gazetteer places shadow catalog ports of the same name.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    catalog: Arc<PortCatalog>,
    places: HashMap<String, (String, Coordinate)>,
}

impl CatalogResolver {
    pub fn new(catalog: Arc<PortCatalog>) -> Self {
        Self {
            catalog,
            places: HashMap::new(),
        }
    }

    /// Add a single named place.
    pub fn with_place(mut self, name: impl Into<String>, coordinate: Coordinate) -> Self {
        let name = name.into();
        self.places.insert(normalize_name(&name), (name, coordinate));
        self
    }

    /// Add places from a CSV gazetteer with `name,lat,lon` columns.
    pub fn with_places_from_reader<R: Read>(mut self, reader: R) -> Result<Self> {
        for row in read_named_points(reader, false)? {
            self.places
                .insert(normalize_name(&row.name), (row.name, row.coordinate));
        }
        Ok(self)
    }

    pub fn with_places_from_path(self, path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        self.with_places_from_reader(file)
    }

    /// Number of gazetteer places in addition to catalog ports.
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    fn suggestions(&self, name: &str) -> Vec<String> {
        let candidates = self
            .places
            .values()
            .map(|(display, _)| display.as_str())
            .chain(self.catalog.entries().iter().map(|e| e.name.as_str()));
        fuzzy_matches(name, candidates, MAX_SUGGESTIONS)
    }
}

#[async_trait]
impl LocationResolver for CatalogResolver {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn resolve(&self, name: &str) -> Result<Coordinate> {
        if let Some((_, coordinate)) = self.places.get(&normalize_name(name)) {
            return Ok(*coordinate);
        }
        if let Some(port) = self.catalog.find(name) {
            return Ok(port.coordinate);
        }
        Err(Error::LocationNotFound {
            name: name.to_string(),
            suggestions: self.suggestions(name),
        })
    }
}

/// Tries each resolver in order and returns the first success.
///
/// When every resolver fails the error is [`Error::LocationNotFound`]
/// carrying the de-duplicated suggestions of all resolvers.
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn LocationResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Arc<dyn LocationResolver>>) -> Self {
        Self { resolvers }
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

#[async_trait]
impl LocationResolver for ResolverChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn resolve(&self, name: &str) -> Result<Coordinate> {
        let mut suggestions: Vec<String> = Vec::new();
        for resolver in &self.resolvers {
            match resolver.resolve(name).await {
                Ok(coordinate) => {
                    debug!(resolver = resolver.name(), name, %coordinate, "location resolved");
                    return Ok(coordinate);
                }
                Err(Error::LocationNotFound {
                    suggestions: found, ..
                }) => {
                    for suggestion in found {
                        if !suggestions.contains(&suggestion) {
                            suggestions.push(suggestion);
                        }
                    }
                }
                Err(err) => {
                    debug!(resolver = resolver.name(), name, error = %err, "resolver failed");
                }
            }
        }
        suggestions.truncate(MAX_SUGGESTIONS);
        Err(Error::LocationNotFound {
            name: name.to_string(),
            suggestions,
        })
    }
}
