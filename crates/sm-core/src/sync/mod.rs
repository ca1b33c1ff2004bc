//! Pass coordinator keeping the map and the table on the same selection
//!
//! Every interaction runs one snapshot -> select -> project -> publish pass
//! while holding the filter lock, so passes never interleave. Publishing
//! swaps the whole frame behind an `Arc`; readers see either the old frame or
//! the new one, never a mix.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::events::events::{FiltersChanged, FiltersReset, FramePublished, PassFailed, StoreLoaded};
use crate::events::EventBus;
use crate::filter::{FilterKey, FilterSnapshot, FilterState, FilterValue};
use crate::projection::{project, Legend, ProjectionStyle, ViewFrame};
use crate::selection::select;
use crate::store::RecordStore;

/// A discrete user interaction
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// Set or clear one filter dimension
    Apply { key: FilterKey, value: FilterValue },
    /// Clear every filter
    Reset,
}

impl InteractionEvent {
    pub fn apply(key: FilterKey, value: FilterValue) -> Self {
        InteractionEvent::Apply { key, value }
    }
}

/// Run one complete pass for a snapshot
pub fn run_pass(
    store: &RecordStore,
    snapshot: &FilterSnapshot,
    style: &ProjectionStyle,
) -> Result<ViewFrame> {
    let selection = select(store, snapshot);
    let frame = project(store, &selection, style)?;
    Ok(frame.with_legend(Legend::for_snapshot(snapshot, style)))
}

/// Owns the filter state and the published frame for one record store
pub struct SyncManager {
    store: RecordStore,
    style: Arc<ProjectionStyle>,
    filters: Mutex<FilterState>,
    published: RwLock<Arc<ViewFrame>>,
    event_bus: Arc<EventBus>,
}

impl SyncManager {
    /// Build the coordinator and publish the unfiltered frame
    pub fn new(store: RecordStore, style: ProjectionStyle, event_bus: Arc<EventBus>) -> Result<Self> {
        let filters = FilterState::for_store(&store);
        let initial = run_pass(&store, &filters.current(), &style)?;

        info!(
            records = store.len(),
            dimensions = ?filters.dimensions(),
            "record store ready"
        );
        event_bus.publish(StoreLoaded {
            records: store.len(),
            dimensions: filters.dimensions().to_vec(),
        });

        Ok(Self {
            store,
            style: Arc::new(style),
            filters: Mutex::new(filters),
            published: RwLock::new(Arc::new(initial)),
            event_bus,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn style(&self) -> &ProjectionStyle {
        &self.style
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Snapshot of the current filter state
    pub fn snapshot(&self) -> FilterSnapshot {
        self.filters.lock().current()
    }

    /// The frame currently on display
    pub fn current_frame(&self) -> Arc<ViewFrame> {
        Arc::clone(&self.published.read())
    }

    /// Apply one interaction and publish the resulting frame.
    ///
    /// On failure the filter change is rolled back, the previous frame stays
    /// published and the error is returned.
    pub fn handle(&self, event: InteractionEvent) -> Result<Arc<ViewFrame>> {
        self.handle_with(event, run_pass)
    }

    fn handle_with<F>(&self, event: InteractionEvent, pass: F) -> Result<Arc<ViewFrame>>
    where
        F: FnOnce(&RecordStore, &FilterSnapshot, &ProjectionStyle) -> Result<ViewFrame>,
    {
        let mut filters = self.filters.lock();
        let previous = filters.clone();

        let (changed, key) = match event {
            InteractionEvent::Apply { key, value } => {
                let label = key.to_string();
                (filters.apply(key, value), Some(label))
            }
            InteractionEvent::Reset => (filters.reset(), None),
        };

        let snapshot = filters.current();
        let frame = match pass(&self.store, &snapshot, self.style.as_ref()) {
            Ok(frame) => Arc::new(frame),
            Err(err) => {
                error!(revision = snapshot.revision(), error = %err, "pass failed; keeping previous frame");
                *filters = previous;
                drop(filters);
                self.event_bus.publish(PassFailed {
                    revision: snapshot.revision(),
                    error: err.to_string(),
                });
                return Err(err);
            }
        };

        self.publish(Arc::clone(&frame));
        drop(filters);

        debug!(
            revision = frame.revision(),
            changed,
            records = frame.len(),
            "pass complete"
        );

        if changed {
            match key {
                Some(key) => self.event_bus.publish(FiltersChanged {
                    revision: snapshot.revision(),
                    key,
                    active_filters: snapshot.criteria().active_keys().len(),
                }),
                None => self.event_bus.publish(FiltersReset {
                    revision: snapshot.revision(),
                }),
            }
        }
        self.event_bus.publish(FramePublished {
            revision: frame.revision(),
            records: frame.len(),
            clusters: frame.markers().clusters().len(),
        });

        Ok(frame)
    }

    /// Replace the displayed frame unless it is newer than `frame`
    fn publish(&self, frame: Arc<ViewFrame>) -> bool {
        let mut slot = self.published.write();
        if frame.revision() < slot.revision() {
            debug!(
                stale = frame.revision(),
                current = slot.revision(),
                "discarding stale frame"
            );
            return false;
        }
        *slot = frame;
        true
    }
}
