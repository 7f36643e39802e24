//! Forecasting layer: the model artifact and the models it can carry.
//!
//! Nothing here trains on data.  A pre-fitted model is restored from a
//! [`artifact::ModelArtifact`] and exposed to the rest of the app only as a
//! [`ForecastModel`] trait object with a `predict(h)` capability.

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::model::PricePoint;
use crate::data::window::FORECAST_LIMIT_DAYS;

pub mod artifact;
pub mod seasonal_naive;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the forecasting domain.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Horizon outside `1..=FORECAST_LIMIT_DAYS`.
    #[error("horizon must be between 1 and {} days, got {0}", FORECAST_LIMIT_DAYS)]
    InvalidHorizon(u32),

    /// Artifact contents fail validation.
    #[error("model artifact is invalid: {0}")]
    BadArtifact(String),

    /// Artifact names a model kind this build does not know.
    #[error("unsupported model kind: {0}")]
    UnsupportedModel(String),
}

// ---------------------------------------------------------------------------
// Forecast result
// ---------------------------------------------------------------------------

/// A forecast: one predicted price per future day.
#[derive(Debug, Clone)]
pub struct Forecast {
    /// Name of the producing model.
    pub model: String,
    /// Predicted points, one per day from the day after the training end.
    pub points: Vec<PricePoint>,
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// A pre-trained model restored from an artifact.  `Debug` is required so
/// `Result<Box<dyn ForecastModel>, _>` stays inspectable in tests.
pub trait ForecastModel: std::fmt::Debug {
    /// Model name as shown in the UI (and carried on [`Forecast::model`]).
    fn name(&self) -> &str;

    /// Last date of the data the artifact was fitted on.  Predictions start
    /// the day after this date.
    fn trained_until(&self) -> NaiveDate;

    /// Predict `horizon` days past [`ForecastModel::trained_until`].
    fn predict(&self, horizon: u32) -> Result<Forecast, ForecastError>;
}
