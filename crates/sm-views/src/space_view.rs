//! Base trait for the views drawn from a published frame

use egui::Ui;
use sm_core::{GeoBounds, ViewFrame};

/// What a view reports back to the host after drawing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewResponse {
    /// The map viewport moved and settled on these bounds
    pub visible_bounds: Option<GeoBounds>,
}

/// A view renders one [`ViewFrame`] and never touches filter state.
///
/// Views keep only presentation state (page, zoom, open popup) and must
/// re-validate it against each frame they are given.
pub trait SpaceView {
    /// Get the title of this view
    fn title(&self) -> &str;

    /// Draw the frame
    fn ui(&mut self, frame: &ViewFrame, ui: &mut Ui) -> ViewResponse;
}
