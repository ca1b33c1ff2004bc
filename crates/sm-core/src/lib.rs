//! Core filter-to-view synchronization for the stakeholder map
//!
//! This crate owns the record store, the filter state, the selection engine
//! and the view projector, plus the coordinator that runs one
//! select -> project pass per user interaction and publishes the result.

pub mod error;
pub mod events;
pub mod filter;
pub mod projection;
pub mod selection;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use events::EventBus;
pub use filter::{FilterCriteria, FilterKey, FilterSnapshot, FilterState, FilterValue};
pub use projection::{
    cluster_radius, project, ClusterPopup, Legend, LegendEntry, Marker, MarkerCluster, MarkerSet,
    PaletteEntry, ProjectionStyle, Rgb, TablePage, TableRow, TableRows, ViewFrame,
};
pub use selection::{select, SelectionResult};
pub use store::{GeoBounds, GeoPosition, Record, RecordId, RecordIndex, RecordStore, StoreId, StoreSchema};
pub use sync::{run_pass, InteractionEvent, SyncManager};
