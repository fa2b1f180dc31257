use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::chart::ChartId;

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at `offset` degrees.
pub fn generate_palette(n: usize, offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = offset + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Each chart gets its own hue.
pub fn series_color(chart: ChartId) -> Color32 {
    let palette = generate_palette(2, 210.0);
    match chart {
        ChartId::Daily => palette[0],
        ChartId::Detail => palette[1],
    }
}
