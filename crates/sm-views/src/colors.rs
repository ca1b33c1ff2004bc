//! Colour conversion for view payloads

use egui::Color32;
use sm_core::Rgb;

/// Marker fill opacity
pub const FILL_ALPHA: f32 = 0.8;

pub fn to_color32(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.0;
    Color32::from_rgb(r, g, b)
}

/// Same hue with the given opacity in `0.0..=1.0`
pub fn with_alpha(rgb: Rgb, alpha: f32) -> Color32 {
    let [r, g, b] = rgb.0;
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion() {
        let rgb = Rgb::from_hex("#e74c3c").unwrap();
        assert_eq!(to_color32(rgb), Color32::from_rgb(0xe7, 0x4c, 0x3c));
        assert_eq!(with_alpha(rgb, 1.0), Color32::from_rgb(0xe7, 0x4c, 0x3c));
        assert_eq!(with_alpha(rgb, 0.0).a(), 0);
    }
}
