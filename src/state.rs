use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::data::loader;
use crate::data::model::PriceSeries;
use crate::data::window;
use crate::forecast::{Forecast, ForecastModel, artifact};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// History file tried at startup; replaceable via File → Open price history….
pub const DEFAULT_HISTORY_PATH: &str = "data/brent_spot.csv";

/// Model artifact tried at startup; replaceable via File → Open model….
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded price history (None until a dataset loads).
    pub history: Option<PriceSeries>,

    /// Restored forecasting model (None until an artifact loads).
    pub model: Option<Box<dyn ForecastModel>>,

    /// Forecast date currently picked; kept inside the selectable range.
    pub picked_date: Option<NaiveDate>,

    /// Result of the last forecast run (cleared when either input changes).
    pub forecast: Option<Forecast>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Source paths shown in the top bar.
    pub history_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            history: None,
            model: None,
            picked_date: None,
            forecast: None,
            status_message: None,
            history_path: None,
            model_path: None,
        }
    }
}

impl AppState {
    /// Attempt the default input files.  Missing defaults are not an error;
    /// the UI shows its empty-state hint until files are opened by hand.
    pub fn load_defaults(&mut self) {
        let history = Path::new(DEFAULT_HISTORY_PATH);
        if history.exists() {
            self.load_history_from(history);
        } else {
            log::info!("No default history at {DEFAULT_HISTORY_PATH}");
        }

        let model = Path::new(DEFAULT_MODEL_PATH);
        if model.exists() {
            self.load_model_from(model);
        } else {
            log::info!("No default model artifact at {DEFAULT_MODEL_PATH}");
        }
    }

    /// Load a price history file into the state.  Failures become a status
    /// message, never a crash.
    pub fn load_history_from(&mut self, path: &Path) {
        match loader::load_history(path) {
            Ok(series) => {
                log::info!(
                    "Loaded {} price rows from {}, last date {}",
                    series.len(),
                    path.display(),
                    series.last_date
                );
                self.set_history(series, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load price history: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Load a model artifact file into the state.
    pub fn load_model_from(&mut self, path: &Path) {
        match artifact::load_model(path) {
            Ok(model) => {
                log::info!(
                    "Loaded {} model from {}, trained until {}",
                    model.name(),
                    path.display(),
                    model.trained_until()
                );
                self.set_model(model, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load model artifact: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a new history: reset the picked date to the start of the
    /// selectable range and drop any forecast computed against old data.
    pub fn set_history(&mut self, series: PriceSeries, path: PathBuf) {
        let (min, _) = window::selectable_range(series.last_date);
        self.picked_date = Some(min);
        self.history = Some(series);
        self.history_path = Some(path);
        self.forecast = None;
        self.status_message = None;
        self.check_alignment();
    }

    /// Ingest a new model: drop any forecast produced by the previous one.
    pub fn set_model(&mut self, model: Box<dyn ForecastModel>, path: PathBuf) {
        self.model = Some(model);
        self.model_path = Some(path);
        self.forecast = None;
        self.status_message = None;
        self.check_alignment();
    }

    /// Warn when the artifact was fitted on different data than the history
    /// on screen.  Forecasting still runs, anchored on the model's own end
    /// date, so the chart will show the gap.
    fn check_alignment(&mut self) {
        let (Some(history), Some(model)) = (&self.history, &self.model) else {
            return;
        };
        let trained = model.trained_until();
        if trained != history.last_date {
            log::warn!(
                "Model trained until {trained} but history ends {}",
                history.last_date
            );
            self.status_message = Some(format!(
                "Model was fitted up to {trained}; history ends {}.",
                history.last_date
            ));
        }
    }

    /// Inclusive range of dates the picker may land on.
    pub fn selectable_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.history
            .as_ref()
            .map(|h| window::selectable_range(h.last_date))
    }

    /// Days between the end of the history and the picked date, when valid.
    pub fn horizon(&self) -> Option<u32> {
        let history = self.history.as_ref()?;
        let picked = self.picked_date?;
        window::horizon(history.last_date, picked)
    }

    /// Pin the picked date back into the selectable range.  The egui date
    /// picker has no min/max bounds of its own, so this runs after every
    /// picker interaction.
    pub fn clamp_picked(&mut self) {
        if let (Some(history), Some(picked)) = (&self.history, self.picked_date) {
            let (min, max) = window::selectable_range(history.last_date);
            let clamped = window::clamp_to_range(picked, min, max);
            if clamped != picked {
                self.picked_date = Some(clamped);
            }
        }
    }

    /// Whether both inputs are present and the submit button should be live.
    pub fn can_forecast(&self) -> bool {
        self.history.is_some() && self.model.is_some()
    }

    /// Run the model over the picked horizon and cache the result.
    pub fn run_forecast(&mut self) {
        let Some(history) = &self.history else {
            return;
        };
        let Some(model) = &self.model else { return };
        let Some(picked) = self.picked_date else {
            return;
        };

        let Some(h) = window::horizon(history.last_date, picked) else {
            self.status_message = Some(format!(
                "Forecast date must be 1 to {} days past {}.",
                window::FORECAST_LIMIT_DAYS,
                history.last_date
            ));
            return;
        };

        match model.predict(h) {
            Ok(forecast) => {
                let end = forecast
                    .points
                    .last()
                    .map(|p| p.date.to_string())
                    .unwrap_or_default();
                log::info!(
                    "{} forecast: {} days, ending {end}",
                    forecast.model,
                    forecast.points.len()
                );
                self.forecast = Some(forecast);
            }
            Err(e) => {
                log::error!("Forecast failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.forecast = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PricePoint;
    use crate::forecast::artifact::ModelArtifact;
    use crate::forecast::seasonal_naive::SeasonalNaive;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn history_ending(last: &str) -> PriceSeries {
        let end = d(last);
        let points = (0..10)
            .map(|i| PricePoint {
                date: end - chrono::Duration::days(9 - i),
                price: 80.0 + i as f64,
            })
            .collect();
        PriceSeries::from_points(points).unwrap()
    }

    fn seasonal_model(trained_until: &str) -> Box<dyn ForecastModel> {
        let artifact = ModelArtifact {
            format_version: 1,
            model: "SeasonalNaive".into(),
            season_length: 3,
            trained_until: d(trained_until),
            last_cycle: vec![88.0, 89.0, 90.0],
        };
        Box::new(SeasonalNaive::from_artifact(&artifact).unwrap())
    }

    #[test]
    fn set_history_resets_the_picked_date() {
        let mut state = AppState::default();
        state.set_history(history_ending("2024-05-15"), "test.csv".into());

        assert_eq!(state.picked_date, Some(d("2024-05-16")));
        assert_eq!(
            state.selectable_range(),
            Some((d("2024-05-16"), d("2024-05-30")))
        );
        assert_eq!(state.horizon(), Some(1));
    }

    #[test]
    fn clamp_pins_the_picked_date_into_range() {
        let mut state = AppState::default();
        state.set_history(history_ending("2024-05-15"), "test.csv".into());

        state.picked_date = Some(d("2025-01-01"));
        state.clamp_picked();
        assert_eq!(state.picked_date, Some(d("2024-05-30")));

        state.picked_date = Some(d("2024-01-01"));
        state.clamp_picked();
        assert_eq!(state.picked_date, Some(d("2024-05-16")));
    }

    #[test]
    fn run_forecast_caches_the_picked_horizon() {
        let mut state = AppState::default();
        state.set_history(history_ending("2024-05-15"), "test.csv".into());
        state.set_model(seasonal_model("2024-05-15"), "model.json".into());
        state.picked_date = Some(d("2024-05-22"));

        state.run_forecast();

        let forecast = state.forecast.as_ref().unwrap();
        assert_eq!(forecast.points.len(), 7);
        assert_eq!(forecast.points[0].date, d("2024-05-16"));
        assert_eq!(forecast.points[6].date, d("2024-05-22"));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn loading_a_new_history_drops_the_old_forecast() {
        let mut state = AppState::default();
        state.set_history(history_ending("2024-05-15"), "test.csv".into());
        state.set_model(seasonal_model("2024-05-15"), "model.json".into());
        state.run_forecast();
        assert!(state.forecast.is_some());

        state.set_history(history_ending("2024-06-28"), "other.csv".into());
        assert!(state.forecast.is_none());
        assert_eq!(state.picked_date, Some(d("2024-06-29")));
    }

    #[test]
    fn misaligned_model_sets_a_warning_status() {
        let mut state = AppState::default();
        state.set_history(history_ending("2024-05-15"), "test.csv".into());
        state.set_model(seasonal_model("2024-04-30"), "model.json".into());

        let status = state.status_message.as_deref().unwrap();
        assert!(status.contains("2024-04-30"));
        assert!(status.contains("2024-05-15"));
    }
}
