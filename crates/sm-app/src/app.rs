//! The dashboard window: routes sidebar and map input through the sync manager

use std::sync::Arc;

use egui::{Context, ScrollArea, SidePanel, Ui};
use sm_core::{
    CoreError, EventBus, FilterKey, FilterValue, InteractionEvent, RecordStore, SyncManager, ViewFrame,
};
use sm_data::{stakeholder_style, DashboardConfig, FilterOptions};
use sm_ui::{header, show_error_messages, status_bar, ErrorMessage, FilterSidebar, SubmissionForm, Tab};
use sm_views::{LegendView, MapView, MapViewConfig, SpaceView, TableConfig, TableView};
use tracing::{debug, info};

pub struct StakeholderApp {
    config: DashboardConfig,
    manager: SyncManager,
    options: FilterOptions,
    /// Frame currently on screen
    frame: Arc<ViewFrame>,

    tab: Tab,
    sidebar: FilterSidebar,
    legend: LegendView,
    map: MapView,
    table: TableView,
    submission: SubmissionForm,
    /// "Filter table to map view" toggle
    filter_to_map: bool,
    error_messages: Vec<ErrorMessage>,
}

impl StakeholderApp {
    pub fn new(store: RecordStore, config: DashboardConfig) -> Result<Self, CoreError> {
        let options = FilterOptions::from_store(&store);
        let style = stakeholder_style(&config.table_columns);
        let manager = SyncManager::new(store, style, Arc::new(EventBus::new()))?;
        let frame = manager.current_frame();

        let map = MapView::new(
            "Stakeholder map",
            MapViewConfig {
                center: config.map_center,
                ..MapViewConfig::default()
            },
        );
        let table = TableView::new(
            "Visible stakeholders",
            TableConfig {
                page_size: config.page_size,
                ..TableConfig::default()
            },
        );

        info!(
            statuses = options.statuses.len(),
            countries = options.countries.len(),
            "dashboard ready"
        );

        Ok(Self {
            config,
            manager,
            options,
            frame,
            tab: Tab::default(),
            sidebar: FilterSidebar::new(),
            legend: LegendView::new("Legend"),
            map,
            table,
            submission: SubmissionForm::default(),
            filter_to_map: false,
            error_messages: Vec::new(),
        })
    }

    /// Run one pass per event. A failed pass keeps the old frame on screen.
    fn dispatch(&mut self, events: Vec<InteractionEvent>) {
        for event in events {
            let is_reset = event == InteractionEvent::Reset;
            let outcome = self.manager.handle(event);
            self.apply_outcome(is_reset, outcome);
        }
    }

    /// The bounds toggle only follows a reset that actually went through
    fn apply_outcome(&mut self, is_reset: bool, outcome: Result<Arc<ViewFrame>, CoreError>) {
        match outcome {
            Ok(frame) => {
                self.frame = frame;
                if is_reset {
                    self.filter_to_map = false;
                }
            }
            Err(err) => self
                .error_messages
                .push(ErrorMessage::new("Could not update the map", err.to_string())),
        }
    }

    fn explore_ui(&mut self, ui: &mut Ui) -> Vec<InteractionEvent> {
        let frame = Arc::clone(&self.frame);
        let mut events = Vec::new();

        self.legend.ui(&frame, ui);
        ui.add_space(6.0);
        let map_response = self.map.ui(&frame, ui);
        ui.add_space(6.0);

        let mut filter_to_map = self.filter_to_map;
        if ui.checkbox(&mut filter_to_map, "Filter table to map view").changed() {
            self.filter_to_map = filter_to_map;
            if filter_to_map {
                if let Some(bounds) = self.map.last_bounds() {
                    events.push(InteractionEvent::apply(FilterKey::Bounds, FilterValue::Within(bounds)));
                }
            } else {
                events.push(InteractionEvent::apply(FilterKey::Bounds, FilterValue::All));
            }
        } else if self.filter_to_map {
            if let Some(bounds) = map_response.visible_bounds {
                debug!(?bounds, "applying map bounds");
                events.push(InteractionEvent::apply(FilterKey::Bounds, FilterValue::Within(bounds)));
            }
        }
        ui.add_space(6.0);

        self.table.ui(&frame, ui);
        events
    }
}

impl eframe::App for StakeholderApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        header(ctx, &self.config.heading, &mut self.tab);
        status_bar(
            ctx,
            &format!(
                "{} stakeholders loaded, {} shown",
                self.manager.store().len(),
                self.frame.len()
            ),
        );

        if self.tab == Tab::Explore {
            let snapshot = self.manager.snapshot();
            let sidebar_events = SidePanel::left("filters")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ScrollArea::vertical()
                        .show(ui, |ui| self.sidebar.ui(ui, &snapshot, &self.options))
                        .inner
                })
                .inner;
            self.dispatch(sidebar_events);
        }

        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                show_error_messages(ui, &mut self.error_messages);
                ScrollArea::vertical()
                    .show(ui, |ui| match self.tab {
                        Tab::Explore => self.explore_ui(ui),
                        Tab::Submit => {
                            self.submission
                                .ui(ui, &self.config.submission_email, &self.config.submission_subject);
                            Vec::new()
                        }
                    })
                    .inner
            })
            .inner;

        if !events.is_empty() {
            self.dispatch(events);
            ctx.request_repaint();
        }
    }
}
