use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::PricePoint;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Forecast table (below the chart)
// ---------------------------------------------------------------------------

/// One row per forecasted day: ISO date and the predicted price.  The cells
/// are formatted views of the forecast points; values pass through unchanged.
pub fn forecast_table(ui: &mut Ui, state: &AppState) {
    let Some(forecast) = &state.forecast else {
        return;
    };

    ui.add_space(8.0);
    ui.strong("Predicted prices");
    ui.add_space(4.0);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(110.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Date");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Predicted price (US$)");
            });
        })
        .body(|mut body| {
            for point in &forecast.points {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(date_cell(point));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(price_cell(point));
                    });
                });
            }
        });
}

fn date_cell(point: &PricePoint) -> String {
    point.date.format("%Y-%m-%d").to_string()
}

fn price_cell(point: &PricePoint) -> String {
    format!("{:.2}", point.price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_render_the_point_without_altering_it() {
        let point = PricePoint {
            date: "2024-05-16".parse().unwrap(),
            price: 90.021,
        };
        assert_eq!(date_cell(&point), "2024-05-16");
        assert_eq!(price_cell(&point), "90.02");
    }
}
