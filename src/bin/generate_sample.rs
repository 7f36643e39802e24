use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use brentcast::forecast::artifact::{ARTIFACT_VERSION, KIND_SEASONAL_NAIVE, ModelArtifact};
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const DAYS: usize = 120;
const SEASON_LENGTH: usize = 7;

fn main() {
    let mut rng = SimpleRng::new(42);

    // Brent-like daily series: slow random walk around the mid-80s with a
    // small weekly wobble, rounded to cents.
    let start = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid start date");
    let weekly = [0.42, 0.18, -0.11, -0.35, -0.27, 0.02, 0.11];

    let mut level = 84.0;
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(DAYS);
    let mut prices: Vec<f64> = Vec::with_capacity(DAYS);

    for i in 0..DAYS {
        level += rng.gauss(0.0, 0.55);
        let price = level + weekly[i % SEASON_LENGTH] + rng.gauss(0.0, 0.25);
        dates.push(start + Duration::days(i as i64));
        prices.push((price * 100.0).round() / 100.0);
    }

    let last_date = dates[DAYS - 1];

    std::fs::create_dir_all("data").expect("Failed to create data directory");

    // ---- CSV, in the EIA export layout the app loads by default ----
    let csv_path = "data/brent_spot.csv";
    let mut csv = String::new();
    csv.push_str("Europe Brent Spot Price FOB (Dollars per Barrel)\n");
    csv.push_str("Source: synthetic sample data\n");
    csv.push_str("Date,Europe Brent Spot Price FOB (Dollars per Barrel)\n");
    for (date, price) in dates.iter().zip(prices.iter()) {
        csv.push_str(&format!("{date},{price:.2}\n"));
    }
    std::fs::write(csv_path, csv).expect("Failed to write CSV");

    // ---- Parquet copy of the same series ----
    let parquet_path = "data/brent_spot.parquet";
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    let day_numbers: Vec<i32> = dates.iter().map(|d| (*d - epoch).num_days() as i32).collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Date32, false),
        Field::new(
            "Europe Brent Spot Price FOB (Dollars per Barrel)",
            DataType::Float64,
            false,
        ),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(day_numbers)),
            Arc::new(Float64Array::from(prices.clone())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // ---- Matching SeasonalNaive artifact: the last fitted weekly cycle ----
    let model_path = "model.json";
    let artifact = ModelArtifact {
        format_version: ARTIFACT_VERSION,
        model: KIND_SEASONAL_NAIVE.to_string(),
        season_length: SEASON_LENGTH,
        trained_until: last_date,
        last_cycle: prices[DAYS - SEASON_LENGTH..].to_vec(),
    };
    let mut body =
        serde_json::to_string_pretty(&artifact).expect("Failed to serialize artifact");
    body.push('\n');
    std::fs::write(model_path, body).expect("Failed to write artifact");

    println!("Wrote {DAYS} days of prices to {csv_path} and {parquet_path}");
    println!(
        "Wrote SeasonalNaive artifact (season {SEASON_LENGTH}, trained until {last_date}) to {model_path}"
    );
}
