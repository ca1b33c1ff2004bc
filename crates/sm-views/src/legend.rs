//! Legend view: colour swatch per status shown

use egui::{Sense, Stroke, Ui, Vec2};
use sm_core::ViewFrame;

use crate::colors::to_color32;
use crate::{SpaceView, ViewResponse};

const SWATCH_SIZE: f32 = 16.0;

pub struct LegendView {
    title: String,
}

impl LegendView {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl SpaceView for LegendView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, frame: &ViewFrame, ui: &mut Ui) -> ViewResponse {
        ui.horizontal_wrapped(|ui| {
            for entry in frame.legend().entries() {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
                ui.painter().rect(
                    rect,
                    2.0,
                    to_color32(entry.colour),
                    Stroke::new(1.0, egui::Color32::from_gray(0x55)),
                );
                ui.label(&entry.label);
                ui.add_space(12.0);
            }
        });
        ViewResponse::default()
    }
}
