//! Map view: one circle per occupied coordinate on a lat/lon plot

use egui::{Pos2, RichText, ScrollArea, Ui};
use egui_plot::{Line, LineStyle, MarkerShape, Plot, PlotPoint, Points};
use sm_core::{ClusterPopup, GeoBounds, GeoPosition, MarkerCluster, StoreId, ViewFrame};
use tracing::debug;

use crate::colors::{to_color32, with_alpha, FILL_ALPHA};
use crate::{SpaceView, ViewResponse};

/// Spacing of the background graticule, in degrees
const GRATICULE_STEP: f64 = 30.0;

/// Bounds closer than this (degrees) count as unchanged
const BOUNDS_EPSILON: f64 = 1e-6;

/// Map view configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    /// Initial centre as `[lat, lon]`
    pub center: [f64; 2],
    pub show_grid: bool,
    pub show_graticule: bool,
    pub height: f32,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: [20.0, 0.0],
            show_grid: false,
            show_graticule: true,
            height: 420.0,
        }
    }
}

/// Equirectangular map of the frame's marker clusters
pub struct MapView {
    title: String,
    pub config: MapViewConfig,

    /// Clusters of the last frame drawn, keyed by its store and revision
    clusters: Option<((StoreId, u64), Vec<MarkerCluster>)>,
    /// Coordinate of the cluster whose popup is open
    open_popup: Option<GeoPosition>,
    last_bounds: Option<GeoBounds>,
    pending_reset: bool,
}

impl MapView {
    pub fn new(title: impl Into<String>, config: MapViewConfig) -> Self {
        Self {
            title: title.into(),
            config,
            clusters: None,
            open_popup: None,
            last_bounds: None,
            pending_reset: true,
        }
    }

    /// Return to the initial centre on the next draw
    pub fn reset_view(&mut self) {
        self.pending_reset = true;
    }

    /// Bounds reported by the last settled viewport
    pub fn last_bounds(&self) -> Option<GeoBounds> {
        self.last_bounds
    }

    fn clusters_for(&mut self, frame: &ViewFrame) -> &[MarkerCluster] {
        let key = (frame.selection().store_id(), frame.revision());
        let stale = self.clusters.as_ref().map_or(true, |(cached, _)| *cached != key);
        if stale {
            let clusters = frame.markers().clusters();
            // a popup for a coordinate that left the selection closes
            if let Some(open) = self.open_popup {
                if !clusters.iter().any(|c| c.position == open) {
                    self.open_popup = None;
                }
            }
            self.clusters = Some((key, clusters));
        }
        self.clusters.as_ref().map(|(_, c)| c.as_slice()).unwrap_or(&[])
    }

    fn draw_popup(&mut self, ui: &mut Ui) {
        let Some(open) = self.open_popup else {
            return;
        };
        let Some(cluster) = self
            .clusters
            .as_ref()
            .and_then(|(_, clusters)| clusters.iter().find(|c| c.position == open))
        else {
            self.open_popup = None;
            return;
        };

        let mut close = false;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                match &cluster.popup {
                    ClusterPopup::Single { title, .. } => ui.strong(title),
                    ClusterPopup::Group { heading, .. } => ui.strong(heading),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    close = ui.small_button("✕").clicked();
                });
            });
            match &cluster.popup {
                ClusterPopup::Single { lines, .. } => {
                    for line in lines {
                        ui.label(line);
                    }
                }
                ClusterPopup::Group { entries, .. } => {
                    ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                        for entry in entries {
                            ui.label(format!("• {}", entry));
                        }
                    });
                }
            }
        });
        if close {
            self.open_popup = None;
        }
    }
}

impl SpaceView for MapView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, frame: &ViewFrame, ui: &mut Ui) -> ViewResponse {
        let [center_lat, center_lon] = self.config.center;
        let show_graticule = self.config.show_graticule;
        let mut plot = Plot::new("stakeholder_map")
            .height(self.config.height)
            .data_aspect(1.0)
            .show_grid(self.config.show_grid)
            .include_x(center_lon - 180.0)
            .include_x(center_lon + 180.0)
            .include_y(center_lat - 70.0)
            .include_y(center_lat + 70.0)
            .label_formatter(|_, point| format!("{:.2}°, {:.2}°", point.y, point.x));
        if std::mem::take(&mut self.pending_reset) {
            plot = plot.reset();
        }

        let clusters = self.clusters_for(frame).to_vec();

        let plot_response = plot.show(ui, |plot_ui| {
            if show_graticule {
                draw_graticule(plot_ui);
            }
            for cluster in &clusters {
                let points = Points::new(vec![[cluster.position.lon, cluster.position.lat]])
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(cluster.radius)
                    .color(with_alpha(cluster.colour, FILL_ALPHA));
                plot_ui.points(points);
            }

            let hovered = plot_ui.pointer_coordinate().and_then(|pointer| {
                let pointer = plot_ui.screen_from_plot(pointer);
                let targets: Vec<(Pos2, f32)> = clusters
                    .iter()
                    .map(|c| {
                        let centre = PlotPoint::new(c.position.lon, c.position.lat);
                        (plot_ui.screen_from_plot(centre), c.radius)
                    })
                    .collect();
                hit_test(&targets, pointer)
            });
            let bounds = plot_ui.plot_bounds();
            (hovered, bounds.min(), bounds.max())
        });

        let (hovered, min, max) = plot_response.inner;
        let mut response = plot_response.response;
        if let Some(cluster) = hovered.and_then(|i| clusters.get(i)) {
            response = response.on_hover_text(cluster.tooltip.clone());
        }
        if response.clicked() {
            self.open_popup = hovered.and_then(|i| clusters.get(i)).map(|c| c.position);
        }

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} people at {} places", frame.len(), clusters.len())).weak());
            if ui.small_button("Recentre").clicked() {
                self.reset_view();
            }
        });
        self.draw_popup(ui);

        let settled = !ui.input(|i| i.pointer.any_down());
        let bounds = geo_bounds_from_plot(min, max);
        let mut visible_bounds = None;
        if settled && self.last_bounds.map_or(true, |last| bounds_changed(last, bounds)) {
            debug!(?bounds, "map viewport settled");
            self.last_bounds = Some(bounds);
            visible_bounds = Some(bounds);
        }

        ViewResponse { visible_bounds }
    }
}

fn draw_graticule(plot_ui: &mut egui_plot::PlotUi) {
    let colour = to_color32(sm_core::Rgb::new(0xc8, 0xc8, 0xc8));
    let mut lon = -180.0;
    while lon <= 180.0 {
        plot_ui.line(
            Line::new(vec![[lon, -90.0], [lon, 90.0]])
                .color(colour)
                .width(0.5)
                .style(LineStyle::dotted_dense()),
        );
        lon += GRATICULE_STEP;
    }
    let mut lat = -90.0;
    while lat <= 90.0 {
        plot_ui.line(
            Line::new(vec![[-180.0, lat], [180.0, lat]])
                .color(colour)
                .width(0.5)
                .style(LineStyle::dotted_dense()),
        );
        lat += GRATICULE_STEP;
    }
}

/// Index of the target whose circle contains `pointer`, nearest centre first
pub fn hit_test(targets: &[(Pos2, f32)], pointer: Pos2) -> Option<usize> {
    targets
        .iter()
        .enumerate()
        .filter_map(|(i, (centre, radius))| {
            let distance = centre.distance(pointer);
            (distance <= *radius).then_some((i, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Plot corners (`[lon, lat]`) as geographic bounds clamped to the globe
pub fn geo_bounds_from_plot(min: [f64; 2], max: [f64; 2]) -> GeoBounds {
    GeoBounds {
        south: min[1].clamp(-90.0, 90.0),
        west: min[0].clamp(-180.0, 180.0),
        north: max[1].clamp(-90.0, 90.0),
        east: max[0].clamp(-180.0, 180.0),
    }
}

fn bounds_changed(a: GeoBounds, b: GeoBounds) -> bool {
    (a.south - b.south).abs() > BOUNDS_EPSILON
        || (a.west - b.west).abs() > BOUNDS_EPSILON
        || (a.north - b.north).abs() > BOUNDS_EPSILON
        || (a.east - b.east).abs() > BOUNDS_EPSILON
}
