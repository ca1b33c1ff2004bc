//! Filter state: the user's current narrowing of the record store
//!
//! The state is mutated in place by interaction events and handed to the
//! selection engine only as an immutable [`FilterSnapshot`]. Snapshots share
//! the criteria through an `Arc`, so taking one is a single clone and a
//! later mutation never shows up in a snapshot already taken.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{GeoBounds, RecordStore};

/// One filter dimension
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    /// Exact-match filter over a named record attribute
    Attribute(String),
    /// Case-insensitive free-text search over the searchable attributes
    Search,
    /// Visible map area
    Bounds,
}

impl FilterKey {
    pub fn attribute(name: impl Into<String>) -> Self {
        FilterKey::Attribute(name.into())
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKey::Attribute(name) => write!(f, "attribute:{}", name),
            FilterKey::Search => write!(f, "search"),
            FilterKey::Bounds => write!(f, "bounds"),
        }
    }
}

/// Value assigned to a filter dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    /// No constraint; clears the dimension
    All,
    /// Keep records whose attribute is one of these values. Empty means no constraint.
    AnyOf(BTreeSet<String>),
    /// Search text. Blank means no constraint.
    Text(String),
    /// Keep records inside this box
    Within(GeoBounds),
}

impl FilterValue {
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }
}

/// The active criteria, one entry per constrained dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    attributes: BTreeMap<String, BTreeSet<String>>,
    search: Option<String>,
    bounds: Option<GeoBounds>,
}

impl FilterCriteria {
    /// True when nothing is constrained, i.e. every record matches
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.search.is_none() && self.bounds.is_none()
    }

    /// Selected values for an attribute dimension, if it is constrained
    pub fn selected(&self, attribute: &str) -> Option<&BTreeSet<String>> {
        self.attributes.get(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Keys currently constraining the selection, in a stable order
    pub fn active_keys(&self) -> Vec<FilterKey> {
        let mut keys: Vec<FilterKey> = self
            .attributes
            .keys()
            .map(|name| FilterKey::Attribute(name.clone()))
            .collect();
        if self.search.is_some() {
            keys.push(FilterKey::Search);
        }
        if self.bounds.is_some() {
            keys.push(FilterKey::Bounds);
        }
        keys
    }
}

/// Immutable view of the filter state at one revision
#[derive(Debug, Clone)]
pub struct FilterSnapshot {
    criteria: Arc<FilterCriteria>,
    revision: u64,
}

impl FilterSnapshot {
    /// The default state: revision zero, nothing constrained
    pub fn unfiltered() -> Self {
        Self {
            criteria: Arc::new(FilterCriteria::default()),
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_default(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl PartialEq for FilterSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision && self.criteria == other.criteria
    }
}

/// Mutable filter state owned by the interaction controller
#[derive(Debug, Clone)]
pub struct FilterState {
    dimensions: Arc<[String]>,
    criteria: Arc<FilterCriteria>,
    revision: u64,
}

impl FilterState {
    /// Create an empty state accepting the given attribute dimensions
    pub fn new<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimensions: dimensions.into_iter().map(Into::into).collect(),
            criteria: Arc::new(FilterCriteria::default()),
            revision: 0,
        }
    }

    /// Create an empty state for the store's filterable attributes
    pub fn for_store(store: &RecordStore) -> Self {
        Self::new(store.schema().filterable.iter().cloned())
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_default(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Set or clear one dimension.
    ///
    /// Returns whether the state changed. Unknown attributes and values of
    /// the wrong kind for the key are dropped here, so they never reach the
    /// selection engine.
    pub fn apply(&mut self, key: FilterKey, value: FilterValue) -> bool {
        let mut next = (*self.criteria).clone();

        match (&key, value) {
            (FilterKey::Attribute(name), value) => {
                if !self.dimensions.iter().any(|d| d == name) {
                    warn!(attribute = %name, "ignoring filter on unknown attribute");
                    return false;
                }
                match value {
                    FilterValue::All => {
                        next.attributes.remove(name);
                    }
                    FilterValue::AnyOf(values) if values.is_empty() => {
                        next.attributes.remove(name);
                    }
                    FilterValue::AnyOf(values) => {
                        next.attributes.insert(name.clone(), values);
                    }
                    other => {
                        warn!(key = %key, value = ?other, "ignoring mismatched filter value");
                        return false;
                    }
                }
            }
            (FilterKey::Search, FilterValue::All) => next.search = None,
            (FilterKey::Search, FilterValue::Text(text)) => {
                let trimmed = text.trim();
                next.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            (FilterKey::Bounds, FilterValue::All) => next.bounds = None,
            (FilterKey::Bounds, FilterValue::Within(bounds)) => {
                if !bounds.is_valid() {
                    warn!(?bounds, "ignoring invalid map bounds");
                    return false;
                }
                next.bounds = Some(bounds);
            }
            (_, other) => {
                warn!(key = %key, value = ?other, "ignoring mismatched filter value");
                return false;
            }
        }

        self.replace(next)
    }

    /// Restore the default state. Returns whether anything was cleared.
    pub fn reset(&mut self) -> bool {
        self.replace(FilterCriteria::default())
    }

    /// Atomic snapshot for the selection engine
    pub fn current(&self) -> FilterSnapshot {
        FilterSnapshot {
            criteria: Arc::clone(&self.criteria),
            revision: self.revision,
        }
    }

    fn replace(&mut self, next: FilterCriteria) -> bool {
        if *self.criteria == next {
            return false;
        }
        self.criteria = Arc::new(next);
        self.revision += 1;
        true
    }
}
