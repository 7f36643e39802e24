use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Date32Array, Date64Array, Float32Array, Float64Array, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use chrono::{DateTime, Duration, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{PricePoint, PriceSeries};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Rows before the header in the EIA "Europe Brent Spot Price FOB" export.
pub const CSV_PREAMBLE_ROWS: usize = 2;

/// Load a price history from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – EIA export layout: 2 preamble rows, header, `Date,Price` rows
/// * `.json`    – `[{ "ds": "2024-05-17", "y": 82.9 }, ...]`
/// * `.parquet` – a date column (Date32/Date64/Timestamp/Utf8) + float prices
///
/// Every loader sorts by date and rejects duplicate dates and empty files.
pub fn load_history(path: &Path) -> Result<PriceSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Column detection
// ---------------------------------------------------------------------------

/// Pick the date and price columns out of a header row.
///
/// The date column is the first header containing "date" (case-insensitive).
/// The price column prefers a header mentioning "price" or "dollar" (the EIA
/// export's long column name), falling back to the first non-date column.
fn detect_columns(headers: &[String]) -> Result<(usize, usize)> {
    let date_idx = headers
        .iter()
        .position(|h| h.to_lowercase().contains("date"))
        .context("no date column found in header")?;

    let price_idx = headers
        .iter()
        .enumerate()
        .position(|(i, h)| {
            let h = h.to_lowercase();
            i != date_idx && (h.contains("price") || h.contains("dollar"))
        })
        .or_else(|| (0..headers.len()).find(|&i| i != date_idx))
        .context("no price column found in header")?;

    Ok((date_idx, price_idx))
}

/// Dates appear as ISO `2024-05-17` or US `05/17/2024` depending on export.
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .with_context(|| format!("'{s}' is not a recognised date"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: the EIA daily-price export.  The sheet title and source line
/// sit above the header, so the real header is `CSV_PREAMBLE_ROWS` down:
///
/// ```text
/// Europe Brent Spot Price FOB (Dollars per Barrel)
/// Source: U.S. Energy Information Administration
/// Date,Europe Brent Spot Price FOB (Dollars per Barrel)
/// 2024-04-16,90.02
/// ```
fn load_csv(path: &Path) -> Result<PriceSeries> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    let mut buf = BufReader::new(file);

    let mut preamble = String::new();
    for row in 0..CSV_PREAMBLE_ROWS {
        preamble.clear();
        let n = buf
            .read_line(&mut preamble)
            .with_context(|| format!("reading preamble row {row}"))?;
        if n == 0 {
            bail!("file ends inside the {CSV_PREAMBLE_ROWS}-row preamble");
        }
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buf);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let (date_idx, price_idx) = detect_columns(&headers)?;

    let mut points = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let price_field = record.get(price_idx).unwrap_or("");
        if price_field.is_empty() {
            // Some exports leave gap days blank.
            continue;
        }

        let date = parse_date(record.get(date_idx).unwrap_or(""))
            .with_context(|| format!("CSV row {row_no}"))?;
        let price = price_field
            .parse::<f64>()
            .with_context(|| format!("CSV row {row_no}: '{price_field}' is not a number"))?;

        points.push(PricePoint { date, price });
    }

    PriceSeries::from_points(points).with_context(|| format!("validating {}", path.display()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON using the source frame's internal column names
/// (`ds` for the date, `y` for the price):
///
/// ```json
/// [
///   { "ds": "2024-04-16", "y": 90.02 },
///   { "ds": "2024-04-17", "y": 87.29 }
/// ]
/// ```
fn load_json(path: &Path) -> Result<PriceSeries> {
    #[derive(Deserialize)]
    struct Record {
        ds: NaiveDate,
        y: f64,
    }

    let file = std::fs::File::open(path).context("opening JSON file")?;
    let records: Vec<Record> =
        serde_json::from_reader(BufReader::new(file)).context("parsing JSON records")?;

    let points = records
        .into_iter()
        .map(|r| PricePoint {
            date: r.ds,
            price: r.y,
        })
        .collect();

    PriceSeries::from_points(points).with_context(|| format!("validating {}", path.display()))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the price history.
///
/// Expected schema: one date-like column (Date32, Date64, any Timestamp
/// unit, or Utf8 date strings) plus one Float64/Float32 price column,
/// located by the same header heuristics as the CSV loader.  Null rows are
/// skipped.
fn load_parquet(path: &Path) -> Result<PriceSeries> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut points = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let (date_idx, price_idx) = detect_columns(&headers)?;

        let date_col = batch.column(date_idx);
        let price_col = batch.column(price_idx);

        for row in 0..batch.num_rows() {
            if date_col.is_null(row) || price_col.is_null(row) {
                continue;
            }

            let date = extract_date(date_col, row)
                .with_context(|| format!("row {row}: failed to read '{}'", headers[date_idx]))?;
            let price = extract_price(price_col, row)
                .with_context(|| format!("row {row}: failed to read '{}'", headers[price_idx]))?;

            points.push(PricePoint { date, price });
        }
    }

    PriceSeries::from_points(points).with_context(|| format!("validating {}", path.display()))
}

// -- Parquet / Arrow helpers --

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

/// Days-since-epoch to a calendar date; values outside chrono's range are an
/// error, never a panic (corrupt files put arbitrary integers here).
fn date_from_epoch_days(days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|d| unix_epoch().checked_add_signed(d))
        .context("date out of range")
}

/// Extract a calendar date from an Arrow column at the given row.
fn extract_date(col: &Arc<dyn Array>, row: usize) -> Result<NaiveDate> {
    match col.data_type() {
        DataType::Date32 => {
            let arr = col.as_any().downcast_ref::<Date32Array>().unwrap();
            date_from_epoch_days(arr.value(row) as i64)
        }
        DataType::Date64 => {
            let arr = col.as_any().downcast_ref::<Date64Array>().unwrap();
            date_from_epoch_days(arr.value(row).div_euclid(86_400_000))
        }
        DataType::Timestamp(unit, _) => {
            let secs = match unit {
                TimeUnit::Second => {
                    let arr = col.as_any().downcast_ref::<TimestampSecondArray>().unwrap();
                    arr.value(row)
                }
                TimeUnit::Millisecond => {
                    let arr = col
                        .as_any()
                        .downcast_ref::<TimestampMillisecondArray>()
                        .unwrap();
                    arr.value(row).div_euclid(1_000)
                }
                TimeUnit::Microsecond => {
                    let arr = col
                        .as_any()
                        .downcast_ref::<TimestampMicrosecondArray>()
                        .unwrap();
                    arr.value(row).div_euclid(1_000_000)
                }
                TimeUnit::Nanosecond => {
                    let arr = col
                        .as_any()
                        .downcast_ref::<TimestampNanosecondArray>()
                        .unwrap();
                    arr.value(row).div_euclid(1_000_000_000)
                }
            };
            DateTime::from_timestamp(secs, 0)
                .map(|dt| dt.date_naive())
                .context("timestamp out of range")
        }
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().unwrap();
            parse_date(arr.value(row))
        }
        other => bail!("unsupported date column type: {other:?}"),
    }
}

/// Extract a price from an Arrow column at the given row.
fn extract_price(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        other => bail!("unsupported price column type: {other:?}"),
    }
}
