use std::time::Duration;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_sanitizer();
        if self.state.is_sanitizing() {
            // Keep polling while the worker sleeps.
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ---- Top panel: title + link ----
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            panels::header(ui, &self.state);
        });

        // ---- Central panel: charts and their controls ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        plot::area_chart(ui, &self.state.charts.daily, CHART_HEIGHT);
                    });
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        panels::year_range(ui, &mut self.state);
                    });
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        plot::area_chart(ui, &self.state.charts.detail, CHART_HEIGHT);
                    });
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        panels::like_inputs(ui, &mut self.state);
                    });
                });
        });
    }
}
