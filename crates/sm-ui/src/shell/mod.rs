use std::time::{Duration, Instant};

use egui::{Context, RichText, TopBottomPanel};

use crate::theme::{accent_color, error_color};

/// How long an error banner stays up
const MESSAGE_LIFETIME: Duration = Duration::from_secs(10);

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Explore,
    Submit,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Explore => "Explore Map",
            Tab::Submit => "Submit Stakeholder",
        }
    }
}

/// Error message to display
pub struct ErrorMessage {
    pub title: String,
    pub message: String,
    pub timestamp: Instant,
}

impl ErrorMessage {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            timestamp: Instant::now(),
        }
    }
}

/// Heading, symposium banner and the tab strip
pub fn header(ctx: &Context, heading: &str, tab: &mut Tab) {
    TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(heading).size(28.0));
        });
        ui.add_space(6.0);

        egui::Frame::none()
            .fill(accent_color())
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("International Symposium on Food & Feed Extrusion")
                        .color(egui::Color32::WHITE)
                        .strong(),
                );
            });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            for candidate in [Tab::Explore, Tab::Submit] {
                ui.selectable_value(tab, candidate, candidate.label());
            }
        });
        ui.add_space(4.0);
    });
}

/// Bottom line with load and selection counts
pub fn status_bar(ctx: &Context, text: &str) {
    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.label(RichText::new(text).small().weak());
    });
}

/// Show error messages younger than [`MESSAGE_LIFETIME`], dropping the rest
pub fn show_error_messages(ui: &mut egui::Ui, messages: &mut Vec<ErrorMessage>) {
    let now = Instant::now();
    messages.retain(|msg| now.duration_since(msg.timestamp) < MESSAGE_LIFETIME);

    for msg in messages.iter() {
        egui::Frame::none()
            .fill(error_color().linear_multiply(0.2))
            .stroke(egui::Stroke::new(1.0, error_color()))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(error_color()));
                    ui.label(&msg.title);
                    ui.separator();
                    ui.label(&msg.message);
                });
            });
    }
}
