//! Views drawn from a published [`sm_core::ViewFrame`]

mod colors;
mod legend;
mod map;
mod space_view;
mod tables;

pub use colors::{to_color32, with_alpha};
pub use legend::LegendView;
pub use map::{geo_bounds_from_plot, hit_test, MapView, MapViewConfig};
pub use space_view::{SpaceView, ViewResponse};
pub use tables::{TableConfig, TableView};
