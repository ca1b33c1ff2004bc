//! Widget id helpers
//!
//! The sidebar builds several combo boxes and toggle rows from data, so ids
//! are derived from the filter dimension and the value index.

use egui::Id;
use std::fmt::Display;

/// Widget ID builder that ensures unique IDs by combining multiple components
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Add a component to the ID
    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    /// Add an index to the ID (useful in loops)
    pub fn index(self, idx: usize) -> Self {
        self.with(format!("idx_{}", idx))
    }

    /// Build the final ID string
    pub fn build(&self) -> String {
        self.components.join("_")
    }

    /// Create an egui ID from this widget ID
    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Id for one filter dimension's widget
pub fn filter_widget_id(dimension: &str) -> WidgetId {
    WidgetId::new("filter").with(dimension.to_lowercase())
}
