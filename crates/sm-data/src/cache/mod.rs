//! Geocode cache: location text -> coordinate

use std::collections::BTreeMap;
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use parking_lot::Mutex;
use sm_core::GeoPosition;
use tracing::{debug, info};

use crate::{DataError, Result};

/// Coordinates resolved ahead of time for each location key.
///
/// The file is a JSON object mapping a location to `[lat, lon]`, where either
/// half may be `null` when the lookup failed.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: AHashMap<String, GeoPosition>,
    /// Locations present in the file without a usable coordinate
    unresolved: AHashSet<String>,
    /// Locations asked for but not resolvable, for reporting after a load
    misses: Mutex<AHashSet<String>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cache file. A missing file is an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no geocode cache found; every location is unresolved");
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path)?;
        let cache = Self::parse(&text).map_err(|e| DataError::Cache {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(
            path = %path.display(),
            resolved = cache.len(),
            unresolved = cache.unresolved.len(),
            "geocode cache loaded"
        );
        Ok(cache)
    }

    /// Parse cache JSON
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, [Option<f64>; 2]> = serde_json::from_str(json)?;
        let mut cache = Self::new();
        for (location, coords) in raw {
            match coords {
                [Some(lat), Some(lon)] if GeoPosition::new(lat, lon).is_finite() => {
                    cache.insert(location, GeoPosition::new(lat, lon));
                }
                _ => {
                    debug!(%location, "cache entry has no coordinate");
                    cache.unresolved.insert(location);
                }
            }
        }
        Ok(cache)
    }

    pub fn insert(&mut self, location: impl Into<String>, position: GeoPosition) {
        let location = location.into();
        self.unresolved.remove(&location);
        self.entries.insert(location, position);
    }

    /// Coordinate for a location key, if the cache resolved it
    pub fn lookup(&self, location: &str) -> Option<GeoPosition> {
        let found = self.entries.get(location).copied();
        if found.is_none() {
            self.misses.lock().insert(location.to_string());
        }
        found
    }

    /// Number of resolved locations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Locations looked up so far that had no coordinate, sorted
    pub fn missing_locations(&self) -> Vec<String> {
        let mut missing: Vec<String> = self.misses.lock().iter().cloned().collect();
        missing.sort();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_null_halves() {
        let cache = GeocodeCache::parse(
            r#"{
                "Paris, France": [48.8566, 2.3522],
                "Atlantis": [null, null],
                "Nowhere, Land": [12.0, null]
            }"#,
        )
        .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("Paris, France"), Some(GeoPosition::new(48.8566, 2.3522)));
        assert_eq!(cache.lookup("Atlantis"), None);
        assert_eq!(cache.lookup("Nowhere, Land"), None);
        assert_eq!(cache.lookup("Lyon, France"), None);
        assert_eq!(
            cache.missing_locations(),
            vec!["Atlantis".to_string(), "Lyon, France".to_string(), "Nowhere, Land".to_string()]
        );
    }

    #[test]
    fn test_missing_file_is_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GeocodeCache::load(&dir.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_malformed_file_is_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        match GeocodeCache::load(&path) {
            Err(DataError::Cache { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected cache error, got {:?}", other),
        }
    }
}
