//! egui widgets for the stakeholder dashboard
//!
//! Theme, page shell, the filter sidebar and the submission form. Widgets
//! report user input as interaction events and never change filter state
//! themselves.

pub mod shell;
pub mod sidebar;
pub mod submission;
pub mod theme;
pub mod widget_utils;

pub use shell::{header, show_error_messages, status_bar, ErrorMessage, Tab};
pub use sidebar::FilterSidebar;
pub use submission::SubmissionForm;
pub use theme::{apply_theme, Theme};
pub use widget_utils::{filter_widget_id, WidgetId};
