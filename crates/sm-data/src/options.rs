//! Choices offered by the filter sidebar

use sm_core::RecordStore;

use crate::status::StatusLevel;

/// Sorted unique values per filter dimension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Every status level in display order, whether present or not
    pub statuses: Vec<String>,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub affiliations: Vec<String>,
}

impl FilterOptions {
    pub fn from_store(store: &RecordStore) -> Self {
        Self {
            statuses: StatusLevel::ALL.iter().map(|level| level.label().to_string()).collect(),
            categories: store.distinct_values("Category"),
            countries: store.distinct_values("Country"),
            affiliations: store.distinct_values("Affiliation"),
        }
    }
}
