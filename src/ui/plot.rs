use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::data::model::PricePoint;
use crate::data::window::{HISTORY_WINDOW_DAYS, trailing_window};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Price chart (central panel)
// ---------------------------------------------------------------------------

const HISTORICAL_NAME: &str = "Historical";
const FORECAST_NAME: &str = "Forecast";

/// Render the price chart: the trailing month of history, plus the forecast
/// once one has been run.
pub fn price_chart(ui: &mut Ui, state: &AppState) {
    let history = match &state.history {
        Some(h) => h,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a price history to begin  (File → Open price history…)");
            });
            return;
        }
    };

    let window = trailing_window(history, HISTORY_WINDOW_DAYS);

    let mut plot = Plot::new("price_chart")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Brent spot price (US$/bbl)")
        .x_axis_formatter(|mark, _range| fmt_day(mark.value))
        .label_formatter(|name, value| {
            let date = fmt_day(value.x);
            if name.is_empty() {
                format!("{date}\n{:.2} US$/bbl", value.y)
            } else {
                format!("{name}\n{date}\n{:.2} US$/bbl", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    // Leave room below for the forecast table.
    if state.forecast.is_some() {
        plot = plot.height(ui.available_height() * 0.62);
    }

    plot.show(ui, |plot_ui| {
        plot_ui.line(series_line(window, HISTORICAL_NAME, Color32::LIGHT_BLUE));

        if let Some(forecast) = &state.forecast {
            plot_ui.line(series_line(&forecast.points, FORECAST_NAME, Color32::RED));
        }
    });
}

// The collected points are owned, so the line borrows nothing.
fn series_line(points: &[PricePoint], name: &str, color: Color32) -> Line<'static> {
    let plot_points: PlotPoints = points
        .iter()
        .map(|p| [day_to_x(p.date), p.price])
        .collect();

    Line::new(plot_points).name(name).color(color).width(1.5)
}

// -- Date axis helpers --
//
// egui_plot axes are numeric, so dates travel as whole days-from-CE and the
// axis formatter turns them back into ISO dates.

fn day_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn fmt_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
