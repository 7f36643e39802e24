use chrono::{Duration, NaiveDate};

use super::model::{PricePoint, PriceSeries};

// ---------------------------------------------------------------------------
// Forecast window arithmetic
// ---------------------------------------------------------------------------

/// How far past the end of the history the forecast date may lie.
pub const FORECAST_LIMIT_DAYS: i64 = 15;

/// How many trailing calendar days of history the chart shows.
pub const HISTORY_WINDOW_DAYS: i64 = 30;

/// Inclusive range of selectable forecast dates for a history ending on
/// `last_date`: the day after the history up to `FORECAST_LIMIT_DAYS` out.
pub fn selectable_range(last_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        last_date + Duration::days(1),
        last_date + Duration::days(FORECAST_LIMIT_DAYS),
    )
}

/// Clamp a candidate date into the inclusive `[min, max]` range.
pub fn clamp_to_range(date: NaiveDate, min: NaiveDate, max: NaiveDate) -> NaiveDate {
    date.max(min).min(max)
}

/// Horizon in days for a forecast ending on `picked`, or `None` when the
/// picked date falls outside the selectable range.
pub fn horizon(last_date: NaiveDate, picked: NaiveDate) -> Option<u32> {
    let h = (picked - last_date).num_days();
    if (1..=FORECAST_LIMIT_DAYS).contains(&h) {
        Some(h as u32)
    } else {
        None
    }
}

/// The trailing `days` calendar days of the series: every point with
/// `date > last_date - days`.
///
/// Business-day series simply yield fewer points inside the window; the
/// window is defined by dates, not by row count.
pub fn trailing_window(series: &PriceSeries, days: i64) -> &[PricePoint] {
    let cutoff = series.last_date - Duration::days(days);
    let start = series.points.partition_point(|p| p.date <= cutoff);
    &series.points[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn series(dates: &[&str]) -> PriceSeries {
        let points = dates
            .iter()
            .enumerate()
            .map(|(i, s)| PricePoint {
                date: d(s),
                price: 80.0 + i as f64,
            })
            .collect();
        PriceSeries::from_points(points).unwrap()
    }

    #[test]
    fn selectable_range_is_one_to_fifteen_days_out() {
        let (min, max) = selectable_range(d("2024-05-15"));
        assert_eq!(min, d("2024-05-16"));
        assert_eq!(max, d("2024-05-30"));
    }

    #[test]
    fn horizon_matches_day_distance_within_bounds() {
        let last = d("2024-05-15");
        assert_eq!(horizon(last, d("2024-05-16")), Some(1));
        assert_eq!(horizon(last, d("2024-05-22")), Some(7));
        assert_eq!(horizon(last, d("2024-05-30")), Some(15));
    }

    #[test]
    fn horizon_rejects_out_of_range_dates() {
        let last = d("2024-05-15");
        assert_eq!(horizon(last, last), None);
        assert_eq!(horizon(last, d("2024-05-14")), None);
        assert_eq!(horizon(last, d("2024-05-31")), None);
    }

    #[test]
    fn clamp_pins_candidates_into_the_range() {
        let (min, max) = selectable_range(d("2024-05-15"));
        assert_eq!(clamp_to_range(d("2024-05-01"), min, max), min);
        assert_eq!(clamp_to_range(d("2024-06-20"), min, max), max);
        assert_eq!(clamp_to_range(d("2024-05-20"), min, max), d("2024-05-20"));
    }

    #[test]
    fn trailing_window_keeps_exactly_the_last_thirty_days() {
        // Last date 2024-05-15; the window is (2024-04-15, 2024-05-15].
        let s = series(&[
            "2024-03-01",
            "2024-04-15", // exactly 30 days before the end: excluded
            "2024-04-16", // 29 days before: included
            "2024-05-01",
            "2024-05-15",
        ]);
        let window = trailing_window(&s, HISTORY_WINDOW_DAYS);
        let dates: Vec<NaiveDate> = window.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2024-04-16"), d("2024-05-01"), d("2024-05-15")]);
    }

    #[test]
    fn trailing_window_handles_business_day_gaps() {
        // Weekends missing, as in the real dataset; every kept point lies
        // inside the window and the newest one is the series end.
        let s = series(&[
            "2024-04-08",
            "2024-04-09",
            "2024-04-10",
            "2024-04-11",
            "2024-04-12",
            "2024-04-15",
            "2024-05-06",
            "2024-05-07",
            "2024-05-10",
        ]);
        let window = trailing_window(&s, HISTORY_WINDOW_DAYS);
        let cutoff = d("2024-05-10") - Duration::days(HISTORY_WINDOW_DAYS);
        assert!(window.iter().all(|p| p.date > cutoff));
        assert_eq!(window.last().map(|p| p.date), Some(s.last_date));
        // 2024-04-10 is the cutoff, so the window starts at 2024-04-11.
        assert_eq!(window.len(), 6);
    }

    #[test]
    fn trailing_window_of_short_series_is_the_whole_series() {
        let s = series(&["2024-05-14", "2024-05-15"]);
        assert_eq!(trailing_window(&s, HISTORY_WINDOW_DAYS).len(), 2);
    }
}
