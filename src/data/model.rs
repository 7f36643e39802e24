use anyhow::{Result, bail};
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// PricePoint – one observation of the Brent spot price
// ---------------------------------------------------------------------------

/// A single dated observation. `price` is US dollars per barrel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// PriceSeries – the complete loaded history
// ---------------------------------------------------------------------------

/// The loaded price history.
///
/// Invariant: `points` is non-empty and strictly increasing by date.
/// [`PriceSeries::from_points`] sorts its input and rejects duplicates, so
/// every series handed to the rest of the app already satisfies this.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// All observations, oldest first.
    pub points: Vec<PricePoint>,
    /// Date of the newest observation (the forecast anchor).
    pub last_date: NaiveDate,
}

impl PriceSeries {
    /// Build a series from loader output: sort by date, validate.
    pub fn from_points(mut points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            bail!("price history contains no rows");
        }

        points.sort_by_key(|p| p.date);

        for pair in points.windows(2) {
            if pair[0].date == pair[1].date {
                bail!("duplicate date in price history: {}", pair[0].date);
            }
        }

        let last_date = points[points.len() - 1].date;
        Ok(PriceSeries { points, last_date })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn pt(date: &str, price: f64) -> PricePoint {
        PricePoint {
            date: d(date),
            price,
        }
    }

    #[test]
    fn from_points_sorts_by_date() {
        let series = PriceSeries::from_points(vec![
            pt("2024-05-03", 84.0),
            pt("2024-05-01", 82.0),
            pt("2024-05-02", 83.0),
        ])
        .unwrap();

        let dates: Vec<NaiveDate> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![d("2024-05-01"), d("2024-05-02"), d("2024-05-03")]
        );
        assert_eq!(series.last_date, d("2024-05-03"));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn from_points_rejects_duplicate_dates() {
        let err = PriceSeries::from_points(vec![
            pt("2024-05-01", 82.0),
            pt("2024-05-01", 82.5),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate date"));
    }

    #[test]
    fn from_points_rejects_empty_input() {
        assert!(PriceSeries::from_points(Vec::new()).is_err());
    }
}
