use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const LISTINGS: usize = 2000;

/// Borough, centre (lat, lon), neighbourhoods.
const BOROUGHS: [(&str, (f64, f64), &[&str]); 5] = [
    ("Manhattan", (40.7831, -73.9712), &["Harlem", "Upper West Side", "Hell's Kitchen", "East Village", "Chelsea"]),
    ("Brooklyn", (40.6782, -73.9442), &["Williamsburg", "Bedford-Stuyvesant", "Bushwick", "Crown Heights", "Park Slope"]),
    ("Queens", (40.7282, -73.7949), &["Astoria", "Long Island City", "Flushing", "Ridgewood"]),
    ("Bronx", (40.8448, -73.8648), &["Fordham", "Mott Haven", "Concourse"]),
    ("Staten Island", (40.5795, -74.1502), &["St. George", "Tompkinsville"]),
];

const ROOM_TYPES: [&str; 3] = ["Private room", "Entire home/apt", "Shared room"];

#[derive(Debug, Serialize)]
struct Row {
    id: i64,
    name: String,
    neighbourhood_group: String,
    neighbourhood: String,
    latitude: f64,
    longitude: f64,
    room_type: String,
    price: i64,
    last_review: Option<String>,
}

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let epoch = chrono::NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default();

    (0..LISTINGS)
        .map(|i| {
            // Manhattan and Brooklyn dominate, as in the real data.
            let borough_idx = match rng.below(10) {
                0..=3 => 0,
                4..=7 => 1,
                8 => 2,
                _ => 3 + rng.below(2),
            };
            let (borough, (lat, lon), neighbourhoods) = BOROUGHS[borough_idx];
            let neighbourhood = neighbourhoods[rng.below(neighbourhoods.len())];
            let room_type = ROOM_TYPES[rng.below(ROOM_TYPES.len())];

            let base = match room_type {
                "Entire home/apt" => 190.0,
                "Private room" => 85.0,
                _ => 55.0,
            };
            let price = rng.gauss(base, base * 0.4).round().max(0.0) as i64;

            // About one listing in five has never been reviewed.
            let last_review = (rng.below(5) != 0).then(|| {
                let day = rng.below(365 * 5) as i64;
                (epoch + chrono::Duration::days(day)).format("%Y-%m-%d").to_string()
            });

            Row {
                id: 1000 + i as i64,
                name: format!("{room_type} in {neighbourhood} #{i}"),
                neighbourhood_group: borough.to_string(),
                neighbourhood: neighbourhood.to_string(),
                latitude: rng.gauss(lat, 0.02),
                longitude: rng.gauss(lon, 0.02),
                room_type: room_type.to_string(),
                price,
                last_review,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn text_column(rows: &[Row], field: fn(&Row) -> &str) -> StringArray {
    StringArray::from(rows.iter().map(field).collect::<Vec<_>>())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("neighbourhood_group", DataType::Utf8, false),
        Field::new("neighbourhood", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("room_type", DataType::Utf8, false),
        Field::new("price", DataType::Int64, false),
        Field::new("last_review", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.id).collect::<Vec<_>>())),
            Arc::new(text_column(rows, |r| &r.name)),
            Arc::new(text_column(rows, |r| &r.neighbourhood_group)),
            Arc::new(text_column(rows, |r| &r.neighbourhood)),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.latitude).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.longitude).collect::<Vec<_>>())),
            Arc::new(text_column(rows, |r| &r.room_type)),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.price).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.last_review.as_deref()).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "sample_listings.csv")?;
    write_parquet(&rows, "sample_listings.parquet")?;

    println!(
        "Wrote {} listings to sample_listings.csv and sample_listings.parquet",
        rows.len()
    );
    Ok(())
}
