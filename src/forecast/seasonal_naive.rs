use chrono::{Duration, NaiveDate};

use super::artifact::ModelArtifact;
use super::{Forecast, ForecastError, ForecastModel};
use crate::data::model::PricePoint;
use crate::data::window::FORECAST_LIMIT_DAYS;

// ---------------------------------------------------------------------------
// SeasonalNaive – replay the last fitted seasonal cycle
// ---------------------------------------------------------------------------

/// Seasonal replay model.
///
/// Prediction step `k` (1-based) is `last_cycle[(k - 1) % season_length]`,
/// dated `trained_until + k` days.
#[derive(Debug, Clone)]
pub struct SeasonalNaive {
    season_length: usize,
    trained_until: NaiveDate,
    last_cycle: Vec<f64>,
}

impl SeasonalNaive {
    /// Restore the model from artifact state, validating its shape.
    pub fn from_artifact(artifact: &ModelArtifact) -> Result<Self, ForecastError> {
        if artifact.season_length == 0 {
            return Err(ForecastError::BadArtifact(
                "season_length must be at least 1".into(),
            ));
        }
        if artifact.last_cycle.len() != artifact.season_length {
            return Err(ForecastError::BadArtifact(format!(
                "last_cycle has {} values but season_length is {}",
                artifact.last_cycle.len(),
                artifact.season_length
            )));
        }
        if artifact.last_cycle.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::BadArtifact(
                "last_cycle contains a non-finite value".into(),
            ));
        }

        Ok(SeasonalNaive {
            season_length: artifact.season_length,
            trained_until: artifact.trained_until,
            last_cycle: artifact.last_cycle.clone(),
        })
    }
}

impl ForecastModel for SeasonalNaive {
    fn name(&self) -> &str {
        "SeasonalNaive"
    }

    fn trained_until(&self) -> NaiveDate {
        self.trained_until
    }

    fn predict(&self, horizon: u32) -> Result<Forecast, ForecastError> {
        if horizon == 0 || i64::from(horizon) > FORECAST_LIMIT_DAYS {
            return Err(ForecastError::InvalidHorizon(horizon));
        }

        log::debug!(
            "SeasonalNaive predict: horizon {horizon}, season_length {}",
            self.season_length
        );

        let points = (1..=i64::from(horizon))
            .map(|k| {
                // checked: an artifact may carry an arbitrarily late date.
                let date = self
                    .trained_until
                    .checked_add_signed(Duration::days(k))
                    .ok_or_else(|| {
                        ForecastError::BadArtifact(format!(
                            "trained_until {} leaves no room for day {k}",
                            self.trained_until
                        ))
                    })?;
                Ok(PricePoint {
                    date,
                    price: self.last_cycle[(k - 1) as usize % self.season_length],
                })
            })
            .collect::<Result<Vec<_>, ForecastError>>()?;

        Ok(Forecast {
            model: self.name().to_string(),
            points,
        })
    }
}
