//! Selection engine: (store, filter snapshot) -> matching record indices

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::filter::FilterSnapshot;
use crate::store::{GeoBounds, Record, RecordIndex, RecordStore, StoreId};

/// Indices of the records matching one filter snapshot, in store order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    store: StoreId,
    revision: u64,
    indices: Arc<[RecordIndex]>,
}

impl SelectionResult {
    /// Store this selection indexes into
    pub fn store_id(&self) -> StoreId {
        self.store
    }

    /// Revision of the filter snapshot this was computed from
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[RecordIndex] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordIndex> + '_ {
        self.indices.iter().copied()
    }
}

/// One sub-predicate of the composite filter
#[derive(Debug)]
enum Clause<'a> {
    AnyOf {
        attribute: &'a str,
        values: &'a BTreeSet<String>,
    },
    Search {
        needle: String,
        attributes: &'a [String],
    },
    Within(GeoBounds),
}

impl Clause<'_> {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Clause::AnyOf { attribute, values } => record
                .attribute(attribute)
                .map(|v| values.contains(v))
                .unwrap_or(false),
            Clause::Search { needle, attributes } => {
                if attributes.is_empty() {
                    record
                        .attributes()
                        .values()
                        .any(|v| v.to_lowercase().contains(needle.as_str()))
                } else {
                    attributes
                        .iter()
                        .filter_map(|name| record.attribute(name))
                        .any(|v| v.to_lowercase().contains(needle.as_str()))
                }
            }
            Clause::Within(bounds) => bounds.contains(record.position()),
        }
    }
}

/// Turn the active criteria into clauses. Inactive dimensions add nothing.
fn compile<'a>(store: &'a RecordStore, snapshot: &'a FilterSnapshot) -> Vec<Clause<'a>> {
    let criteria = snapshot.criteria();
    let mut clauses: Vec<Clause<'a>> = criteria
        .attributes()
        .map(|(attribute, values)| Clause::AnyOf { attribute, values })
        .collect();

    if let Some(search) = criteria.search() {
        clauses.push(Clause::Search {
            needle: search.to_lowercase(),
            attributes: &store.schema().searchable,
        });
    }

    if let Some(bounds) = criteria.bounds() {
        clauses.push(Clause::Within(bounds));
    }

    clauses
}

/// Scan the store once, keeping every record that satisfies all active clauses.
///
/// An empty snapshot selects every index; a combination nothing satisfies
/// yields an empty selection rather than an error.
pub fn select(store: &RecordStore, snapshot: &FilterSnapshot) -> SelectionResult {
    let clauses = compile(store, snapshot);

    let indices: Arc<[RecordIndex]> = if clauses.is_empty() {
        store.indices().collect()
    } else {
        store
            .iter()
            .filter(|(_, record)| clauses.iter().all(|clause| clause.matches(record)))
            .map(|(idx, _)| idx)
            .collect()
    };

    debug!(
        revision = snapshot.revision(),
        clauses = clauses.len(),
        matched = indices.len(),
        total = store.len(),
        "selection computed"
    );

    SelectionResult {
        store: store.id(),
        revision: snapshot.revision(),
        indices,
    }
}
