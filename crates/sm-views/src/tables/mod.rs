//! Table view: the frame's rows, one page at a time

use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use sm_core::{TableRows, ViewFrame};
use tracing::debug;

use crate::{SpaceView, ViewResponse};

/// Configuration for table views
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    pub page_size: usize,
    pub striped_rows: bool,
    pub resizable_columns: bool,
    /// Cells longer than this are truncated with an ellipsis
    pub max_cell_chars: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            striped_rows: true,
            resizable_columns: true,
            max_cell_chars: 60,
        }
    }
}

/// Paginated table of the visible records
pub struct TableView {
    title: String,
    pub config: TableConfig,
    page: usize,
}

impl TableView {
    pub fn new(title: impl Into<String>, config: TableConfig) -> Self {
        Self {
            title: title.into(),
            config,
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Pull the requested page back inside `rows` and return it
    pub fn clamp_page(&mut self, rows: &TableRows) -> usize {
        let last = rows.page_count(self.config.page_size) - 1;
        if self.page > last {
            debug!(requested = self.page, last, "table page clamped to current rows");
            self.page = last;
        }
        self.page
    }

    fn render_table(&self, ui: &mut Ui, rows: &TableRows) {
        let page = rows.page(self.page, self.config.page_size);
        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let columns = rows.columns();

        let mut builder = TableBuilder::new(ui)
            .striped(self.config.striped_rows)
            .resizable(self.config.resizable_columns)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .vscroll(false);
        for _ in columns {
            builder = builder.column(Column::initial(150.0).at_least(60.0).clip(true));
        }

        builder
            .header(20.0, |mut header| {
                for name in columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, page.rows.len(), |row_index, mut row| {
                    let Some(record) = page.rows.get(row_index) else {
                        return;
                    };
                    for cell in &record.cells {
                        row.col(|ui| {
                            ui.label(truncate(cell, self.config.max_cell_chars)).on_hover_text(cell);
                        });
                    }
                });
            });
    }

    fn render_pager(&mut self, ui: &mut Ui, rows: &TableRows) {
        let page_count = rows.page_count(self.config.page_size);
        ui.horizontal(|ui| {
            if ui.add_enabled(self.page > 0, egui::Button::new("⏮")).clicked() {
                self.page = 0;
            }
            if ui.add_enabled(self.page > 0, egui::Button::new("◀")).clicked() {
                self.page -= 1;
            }
            ui.label(format!("Page {} of {}", self.page + 1, page_count));
            if ui.add_enabled(self.page + 1 < page_count, egui::Button::new("▶")).clicked() {
                self.page += 1;
            }
            if ui.add_enabled(self.page + 1 < page_count, egui::Button::new("⏭")).clicked() {
                self.page = page_count - 1;
            }
            ui.separator();
            ui.label(RichText::new(format!("{} rows", rows.len())).weak());
        });
    }
}

impl SpaceView for TableView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, frame: &ViewFrame, ui: &mut Ui) -> ViewResponse {
        let rows = frame.rows();
        self.clamp_page(rows);

        ui.heading(&self.title);
        if rows.is_empty() {
            ui.label(RichText::new("No stakeholders match the current filters").weak());
        } else {
            egui::ScrollArea::horizontal().show(ui, |ui| self.render_table(ui, rows));
        }
        self.render_pager(ui, rows);

        ViewResponse::default()
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut short: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
