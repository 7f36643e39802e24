/// Data layer: core types, loading, and window arithmetic.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PriceSeries (sorted, unique dates)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ PriceSeries   │  Vec<PricePoint>, last_date
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  trailing 30-day view, forecast-date bounds, horizon
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod window;
