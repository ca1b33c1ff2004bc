//! Filter sidebar: turns clicks into interaction events

use std::collections::BTreeSet;

use egui::{Color32, ComboBox, RichText, TextEdit, Ui};
use sm_core::{FilterKey, FilterSnapshot, FilterValue, InteractionEvent};
use sm_data::{FilterOptions, StatusLevel};
use tracing::debug;

use crate::widget_utils::filter_widget_id;

/// Filter controls. The sidebar never holds filter state of its own: every
/// draw reads the current snapshot, and every change goes out as an
/// [`InteractionEvent`] for the controller to apply.
#[derive(Default)]
pub struct FilterSidebar {
    /// Search text being typed, applied on Enter or focus loss
    search_text: String,
    /// Snapshot revision the search box was last synced to
    synced_revision: Option<u64>,
}

impl FilterSidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the sidebar and return the events the user triggered
    pub fn ui(&mut self, ui: &mut Ui, snapshot: &FilterSnapshot, options: &FilterOptions) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        let criteria = snapshot.criteria();

        let search_id = filter_widget_id("search").id();
        let search_focused = ui.memory(|m| m.has_focus(search_id));
        if self.synced_revision != Some(snapshot.revision()) && !search_focused {
            self.search_text = criteria.search().unwrap_or_default().to_string();
            self.synced_revision = Some(snapshot.revision());
        }

        ui.label(RichText::new("Search all").strong());
        let response = ui.add(
            TextEdit::singleline(&mut self.search_text)
                .id(search_id)
                .hint_text("Type to search…")
                .desired_width(f32::INFINITY),
        );
        if response.lost_focus() && self.search_text.trim() != criteria.search().unwrap_or_default() {
            events.push(InteractionEvent::apply(
                FilterKey::Search,
                FilterValue::Text(self.search_text.clone()),
            ));
        }
        ui.add_space(8.0);

        ui.label(RichText::new("Attendance status").strong());
        toggle_row(ui, "Status", &options.statuses, criteria.selected("Status"), &mut events, |label| {
            StatusLevel::from_label(label).map(|level| {
                let [r, g, b] = level.colour().0;
                Color32::from_rgb(r, g, b)
            })
        });
        ui.add_space(8.0);

        ui.label(RichText::new("Category").strong());
        toggle_row(ui, "Category", &options.categories, criteria.selected("Category"), &mut events, |_| None);
        ui.add_space(8.0);

        ui.label(RichText::new("Country").strong());
        multi_select(ui, "Country", "All countries", &options.countries, criteria.selected("Country"), &mut events);
        ui.add_space(8.0);

        ui.label(RichText::new("Affiliation").strong());
        multi_select(
            ui,
            "Affiliation",
            "All affiliations",
            &options.affiliations,
            criteria.selected("Affiliation"),
            &mut events,
        );
        ui.add_space(12.0);

        let reset = ui.add_enabled(!snapshot.is_default(), egui::Button::new("Reset filters"));
        if reset.clicked() {
            self.search_text.clear();
            events.push(InteractionEvent::Reset);
        }

        for event in &events {
            debug!(?event, "sidebar interaction");
        }
        events
    }
}

fn toggle_row(
    ui: &mut Ui,
    dimension: &str,
    values: &[String],
    selected: Option<&BTreeSet<String>>,
    events: &mut Vec<InteractionEvent>,
    swatch: impl Fn(&str) -> Option<Color32>,
) {
    ui.horizontal_wrapped(|ui| {
        for (idx, value) in values.iter().enumerate() {
            let is_selected = selected.is_some_and(|s| s.contains(value));
            let mut text = RichText::new(value);
            if let Some(colour) = swatch(value) {
                text = text.color(if is_selected { Color32::WHITE } else { colour });
            }
            let response = ui.push_id(filter_widget_id(dimension).index(idx).id(), |ui| {
                ui.selectable_label(is_selected, text)
            });
            if response.inner.clicked() {
                events.push(InteractionEvent::apply(
                    FilterKey::attribute(dimension),
                    toggled(selected, value),
                ));
            }
        }
    });
}

fn multi_select(
    ui: &mut Ui,
    dimension: &str,
    all_label: &str,
    values: &[String],
    selected: Option<&BTreeSet<String>>,
    events: &mut Vec<InteractionEvent>,
) {
    ui.horizontal(|ui| {
        ComboBox::from_id_source(filter_widget_id(dimension).build())
            .selected_text(selection_summary(selected, all_label))
            .width(ui.available_width() - 30.0)
            .show_ui(ui, |ui| {
                for value in values {
                    let mut checked = selected.is_some_and(|s| s.contains(value));
                    if ui.checkbox(&mut checked, value).changed() {
                        events.push(InteractionEvent::apply(
                            FilterKey::attribute(dimension),
                            toggled(selected, value),
                        ));
                    }
                }
            });
        if selected.is_some() && ui.small_button("✕").on_hover_text("Clear").clicked() {
            events.push(InteractionEvent::apply(FilterKey::attribute(dimension), FilterValue::All));
        }
    });
}

/// Selection after flipping `value`; an emptied selection clears the filter
pub fn toggled(selected: Option<&BTreeSet<String>>, value: &str) -> FilterValue {
    let mut next = selected.cloned().unwrap_or_default();
    if !next.remove(value) {
        next.insert(value.to_string());
    }
    if next.is_empty() {
        FilterValue::All
    } else {
        FilterValue::AnyOf(next)
    }
}

/// Combo box caption for a multi-select
pub fn selection_summary(selected: Option<&BTreeSet<String>>, all_label: &str) -> String {
    match selected.map(|s| s.len()) {
        None | Some(0) => all_label.to_string(),
        Some(1) => selected
            .and_then(|s| s.iter().next())
            .cloned()
            .unwrap_or_else(|| all_label.to_string()),
        Some(n) => format!("{} selected", n),
    }
}
