use std::path::Path;

use eframe::egui::{self, Button, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::window::FORECAST_LIMIT_DAYS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – forecast controls
// ---------------------------------------------------------------------------

/// Render the forecast control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Forecast");
    ui.separator();

    let Some((min, max)) = state.selectable_range() else {
        ui.label("No price history loaded.");
        return;
    };

    ui.label(format!(
        "The forecast date may fall between {min} and {max} \
         ({FORECAST_LIMIT_DAYS} days past the end of the history)."
    ));
    ui.add_space(8.0);

    ui.strong("Forecast date");
    if let Some(picked) = state.picked_date.as_mut() {
        ui.add(DatePickerButton::new(picked));
    }
    // The picker has no min/max of its own; pin whatever came back.
    state.clamp_picked();

    if let Some(h) = state.horizon() {
        let days = if h == 1 { "day" } else { "days" };
        ui.label(format!("Horizon: {h} {days}"));
    }
    ui.add_space(8.0);

    let full_width = egui::vec2(ui.available_width(), 24.0);
    let run = ui.add_enabled(
        state.can_forecast(),
        Button::new("Run forecast").min_size(full_width),
    );
    if run.clicked() {
        state.run_forecast();
    }

    if state.model.is_none() {
        ui.add_space(4.0);
        ui.label(RichText::new("Load a model artifact to enable forecasting.").weak());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open price history…").clicked() {
                open_history_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open model…").clicked() {
                open_model_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(history), Some(path)) = (&state.history, &state.history_path) {
            ui.label(format!(
                "{}: {} price rows, last date {}",
                file_label(path),
                history.len(),
                history.last_date
            ));
        }

        if let (Some(model), Some(path)) = (&state.model, &state.model_path) {
            ui.separator();
            ui.label(format!("model: {} ({})", model.name(), file_label(path)));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Just the file name, for the compact top-bar labels.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_history_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open price history")
        .add_filter("Price history", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_history_from(&path);
    }
}

pub fn open_model_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open model artifact")
        .add_filter("Model artifact", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_model_from(&path);
    }
}
