use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BrentcastApp {
    pub state: AppState,
}

impl Default for BrentcastApp {
    fn default() -> Self {
        let mut state = AppState::default();
        state.load_defaults();
        Self { state }
    }
}

impl eframe::App for BrentcastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: forecast controls ----
        egui::SidePanel::left("forecast_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Brent crude price forecast");
            ui.separator();
            plot::price_chart(ui, &self.state);
            table::forecast_table(ui, &self.state);
        });
    }
}
