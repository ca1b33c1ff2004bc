use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Flat Light".to_string(),
            dark_mode: false,
        }
    }
}

/// Apply the dashboard theme: flat widgets on a light background with the
/// symposium blue as accent
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let accent = accent_color();
    let (panel_bg, widget_bg, border, text) = if theme.dark_mode {
        (
            Color32::from_rgb(31, 31, 31),
            Color32::from_rgb(40, 40, 40),
            Color32::from_rgb(70, 70, 70),
            Color32::from_rgb(220, 220, 220),
        )
    } else {
        (
            Color32::from_rgb(255, 255, 255),
            Color32::from_rgb(248, 249, 250),
            Color32::from_rgb(206, 212, 218),
            Color32::from_rgb(44, 62, 80),
        )
    };

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.faint_bg_color = widget_bg;

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
    ] {
        widget.bg_stroke = Stroke::new(1.0, border);
        widget.fg_stroke = Stroke::new(1.0, text);
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = accent;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Banner and accent blue
pub fn accent_color() -> Color32 {
    Color32::from_rgb(0x00, 0x96, 0xd6)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(0xe7, 0x4c, 0x3c)
}

pub fn success_color() -> Color32 {
    Color32::from_rgb(0x18, 0xbc, 0x9c)
}
