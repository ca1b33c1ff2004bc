//! Record store: the immutable, ordered dataset every pass filters over

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier assigned to a record at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one loaded store, used to reject selections computed against another store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store-{}", self.0)
    }
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// An axis-aligned latitude/longitude box, inclusive on every edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// The whole globe
    pub const WORLD: GeoBounds = GeoBounds {
        south: -90.0,
        west: -180.0,
        north: 90.0,
        east: 180.0,
    };

    /// Build bounds from the south-west and north-east corners
    pub fn from_corners(south_west: GeoPosition, north_east: GeoPosition) -> Self {
        Self {
            south: south_west.lat,
            west: south_west.lon,
            north: north_east.lat,
            east: north_east.lon,
        }
    }

    /// Finite and not inverted
    pub fn is_valid(&self) -> bool {
        [self.south, self.west, self.north, self.east]
            .iter()
            .all(|v| v.is_finite())
            && self.south <= self.north
            && self.west <= self.east
    }

    pub fn contains(&self, position: GeoPosition) -> bool {
        position.lat >= self.south
            && position.lat <= self.north
            && position.lon >= self.west
            && position.lon <= self.east
    }
}

/// One displayable geographic entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    id: RecordId,
    position: GeoPosition,
    attributes: IndexMap<String, String>,
}

impl Record {
    pub fn new(id: RecordId, position: GeoPosition, attributes: IndexMap<String, String>) -> Self {
        Self {
            id,
            position,
            attributes,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn position(&self) -> GeoPosition {
        self.position
    }

    /// Value of a single attribute, if the record carries it
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }
}

/// Position of a record inside the store that produced it.
///
/// Only the store hands these out, so every index is in `0..store.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecordIndex(usize);

impl RecordIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which attributes the filters and free-text search operate on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSchema {
    /// Attributes exposed as filter dimensions
    pub filterable: Vec<String>,
    /// Attributes the search box looks into; empty means every attribute
    pub searchable: Vec<String>,
}

/// Immutable, ordered collection of records loaded once at startup
#[derive(Debug, Clone)]
pub struct RecordStore {
    id: StoreId,
    records: Arc<[Record]>,
    schema: Arc<StoreSchema>,
}

impl RecordStore {
    /// Freeze a loaded record list into a store.
    ///
    /// Fails when there is nothing to show or when two records share an id.
    pub fn new(records: Vec<Record>, schema: StoreSchema) -> Result<Self> {
        if records.is_empty() {
            return Err(CoreError::EmptyStore);
        }

        let mut seen = AHashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CoreError::DuplicateId(record.id.0));
            }
        }

        Ok(Self {
            id: StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)),
            records: records.into(),
            schema: Arc::new(schema),
        })
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> &StoreSchema {
        &self.schema
    }

    /// Checked conversion from a raw position
    pub fn index_of(&self, position: usize) -> Option<RecordIndex> {
        (position < self.records.len()).then_some(RecordIndex(position))
    }

    pub fn get(&self, index: RecordIndex) -> Option<&Record> {
        self.records.get(index.0)
    }

    /// Every index in store order
    pub fn indices(&self) -> impl Iterator<Item = RecordIndex> + '_ {
        (0..self.records.len()).map(RecordIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordIndex, &Record)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (RecordIndex(idx), record))
    }

    /// Sorted unique non-empty values of one attribute
    pub fn distinct_values(&self, attribute: &str) -> Vec<String> {
        let mut values: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.attribute(attribute))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<AHashSet<_>>()
            .into_iter()
            .collect();
        values.sort();
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, city: &str) -> Record {
        let mut attributes = IndexMap::new();
        attributes.insert("city".to_string(), city.to_string());
        Record::new(RecordId(id), GeoPosition::new(0.0, 0.0), attributes)
    }

    #[test]
    fn test_empty_store_is_rejected() {
        let err = RecordStore::new(Vec::new(), StoreSchema::default()).unwrap_err();
        assert_eq!(err, CoreError::EmptyStore);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = RecordStore::new(vec![record(1, "A"), record(1, "B")], StoreSchema::default())
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateId(1));
    }

    #[test]
    fn test_index_of_is_bounds_checked() {
        let store = RecordStore::new(vec![record(1, "A"), record(2, "B")], StoreSchema::default())
            .unwrap();
        assert_eq!(store.index_of(1).map(RecordIndex::get), Some(1));
        assert!(store.index_of(2).is_none());
    }

    #[test]
    fn test_distinct_values_sorted_and_unique() {
        let store = RecordStore::new(
            vec![record(1, "B"), record(2, "A"), record(3, "B"), record(4, "")],
            StoreSchema::default(),
        )
        .unwrap();
        assert_eq!(store.distinct_values("city"), vec!["A", "B"]);
    }

    #[test]
    fn test_stores_get_distinct_ids() {
        let a = RecordStore::new(vec![record(1, "A")], StoreSchema::default()).unwrap();
        let b = RecordStore::new(vec![record(1, "A")], StoreSchema::default()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = GeoBounds::from_corners(GeoPosition::new(-10.0, -20.0), GeoPosition::new(10.0, 20.0));
        assert!(bounds.contains(GeoPosition::new(10.0, 20.0)));
        assert!(bounds.contains(GeoPosition::new(-10.0, -20.0)));
        assert!(!bounds.contains(GeoPosition::new(10.5, 0.0)));
        assert!(bounds.is_valid());
        assert!(!GeoBounds::from_corners(GeoPosition::new(5.0, 0.0), GeoPosition::new(-5.0, 1.0)).is_valid());
    }
}
