use eframe::egui::{self, RichText, Ui};
use egui_plot::{GridMark, Line, Plot, PlotPoints};

use crate::chart::{date_to_x, x_to_date, ChartPoint, ChartSpec, RenderError, TITLE_FONT_SIZE};
use crate::color::series_color;

// ---------------------------------------------------------------------------
// Area chart panel
// ---------------------------------------------------------------------------

/// Render one chart panel: the bold centred title and the area plot, or a
/// "no data" notice when the filtered series was empty.
pub fn area_chart(ui: &mut Ui, chart: &Result<ChartSpec, RenderError>, height: f32) {
    let spec = match chart {
        Ok(spec) => spec,
        Err(e) => {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("No data in range");
                    ui.label(e.to_string());
                });
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&spec.title).strong().size(TITLE_FONT_SIZE));
    });

    let points: PlotPoints = spec
        .points
        .iter()
        .map(|p| [date_to_x(p.date), p.value])
        .collect();

    let line = Line::new(points)
        .name(spec.y_field)
        .color(series_color(spec.id))
        .fill(0.0_f32)
        .width(1.5);

    Plot::new(spec.id.to_string())
        .height(height)
        .show_grid(false)
        .x_axis_label(spec.x_field)
        .y_axis_label(spec.y_field)
        .x_axis_formatter(|mark: GridMark, _range| {
            x_to_date(mark.value)
                .map(|d| d.to_string())
                .unwrap_or_default()
        })
        .label_formatter(|_name, value| {
            spec.nearest_point(value.x, value.y)
                .map(ChartPoint::hover_text)
                .unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}
