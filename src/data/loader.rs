use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type,
};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Dataset, Listing, RoomType};

/// Columns every input file must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "neighbourhood_group",
    "neighbourhood",
    "room_type",
    "latitude",
    "longitude",
    "price",
    "last_review",
];

/// Schema and coercion failures while reading a listings file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: '{value}' is not a valid listing id")]
    InvalidId { row: usize, value: String },
    #[error("row {row}: '{value}' is not a valid price")]
    InvalidPrice { row: usize, value: String },
    #[error("row {row}: '{value}' is not a valid review date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: {message}")]
    InvalidRoomType { row: usize, message: String },
    #[error("row {row}: column '{column}' is null")]
    NullValue { row: usize, column: &'static str },
    #[error("column '{column}' has unsupported type {data_type}")]
    ColumnType {
        column: &'static str,
        data_type: DataType,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least [`REQUIRED_COLUMNS`]
/// * `.parquet` – the same columns stored as Arrow-typed columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} listings from {} ({} boroughs, {} neighbourhoods, reviews {:?}, prices {:?})",
        dataset.len(),
        path.display(),
        dataset.boroughs.len(),
        dataset.neighbourhoods.len(),
        dataset.review_bounds,
        dataset.price_bounds
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Shared coercion helpers
// ---------------------------------------------------------------------------

/// Parse a review date. Accepts plain dates, timestamps and US-style dates.
pub fn parse_review_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

fn coerce_price(row: usize, value: f64) -> Result<f64, LoadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LoadError::InvalidPrice {
            row,
            value: value.to_string(),
        })
    }
}

fn coerce_date(row: usize, raw: Option<&str>) -> Result<Option<NaiveDate>, LoadError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_review_date(s).map(Some).ok_or_else(|| LoadError::InvalidDate {
            row,
            value: s.to_string(),
        }),
    }
}

fn coerce_room_type(row: usize, raw: &str) -> Result<RoomType, LoadError> {
    raw.parse()
        .map_err(|message| LoadError::InvalidRoomType { row, message })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: u64,
    name: Option<String>,
    neighbourhood_group: String,
    neighbourhood: String,
    room_type: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    price: String,
    last_review: Option<String>,
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(LoadError::MissingColumn(column).into());
        }
    }

    let mut listings = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let price = row
            .price
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| LoadError::InvalidPrice {
                row: row_no,
                value: row.price.clone(),
            })
            .and_then(|p| coerce_price(row_no, p))?;

        listings.push(Listing {
            id: row.id,
            name: row.name.unwrap_or_default(),
            borough: row.neighbourhood_group,
            neighbourhood: row.neighbourhood,
            room_type: coerce_room_type(row_no, &row.room_type)?,
            latitude: row.latitude,
            longitude: row.longitude,
            price,
            last_review: coerce_date(row_no, row.last_review.as_deref())?,
        });
    }

    Ok(Dataset::from_listings(listings))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the listings schema.
///
/// Text columns may be `Utf8` or `LargeUtf8`; numeric columns any of
/// `Int32`/`Int64`/`Float32`/`Float64`; `last_review` either `Date32` or
/// text in one of the formats [`parse_review_date`] understands.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut listings = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let id = column(&batch, "id")?;
        let name = column(&batch, "name")?;
        let borough = column(&batch, "neighbourhood_group")?;
        let neighbourhood = column(&batch, "neighbourhood")?;
        let room_type = column(&batch, "room_type")?;
        let latitude = column(&batch, "latitude")?;
        let longitude = column(&batch, "longitude")?;
        let price = column(&batch, "price")?;
        let last_review = column(&batch, "last_review")?;

        for row in 0..batch.num_rows() {
            let row_no = listings.len();
            let required = |col: &ArrayRef, name: &'static str| -> Result<String> {
                string_at(col, row, name)?
                    .ok_or_else(|| LoadError::NullValue { row: row_no, column: name }.into())
            };

            let price_value = number_at(price, row, "price")?
                .ok_or(LoadError::NullValue { row: row_no, column: "price" })?;

            listings.push(Listing {
                id: id_at(id, row, row_no)?,
                name: string_at(name, row, "name")?.unwrap_or_default(),
                borough: required(borough, "neighbourhood_group")?,
                neighbourhood: required(neighbourhood, "neighbourhood")?,
                room_type: coerce_room_type(row_no, &required(room_type, "room_type")?)?,
                latitude: number_at(latitude, row, "latitude")?,
                longitude: number_at(longitude, row, "longitude")?,
                price: coerce_price(row_no, price_value)?,
                last_review: date_at(last_review, row, row_no)?,
            });
        }
    }

    Ok(Dataset::from_listings(listings))
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn string_at(col: &ArrayRef, row: usize, name: &'static str) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    if let Some(arr) = col.as_string_opt::<i32>() {
        Ok(Some(arr.value(row).to_string()))
    } else if let Some(arr) = col.as_string_opt::<i64>() {
        Ok(Some(arr.value(row).to_string()))
    } else {
        Err(LoadError::ColumnType {
            column: name,
            data_type: col.data_type().clone(),
        }
        .into())
    }
}

/// Integer columns are read natively; float ids must be whole and non-negative.
fn id_at(col: &ArrayRef, row: usize, row_no: usize) -> Result<u64> {
    if col.is_null(row) {
        bail!(LoadError::NullValue { row: row_no, column: "id" });
    }
    let invalid = |value: String| LoadError::InvalidId { row: row_no, value };

    let id = match col.data_type() {
        DataType::UInt64 => col.as_primitive::<UInt64Type>().value(row),
        DataType::UInt32 => u64::from(col.as_primitive::<UInt32Type>().value(row)),
        DataType::Int64 => {
            let v = col.as_primitive::<Int64Type>().value(row);
            u64::try_from(v).map_err(|_| invalid(v.to_string()))?
        }
        DataType::Int32 => {
            let v = col.as_primitive::<Int32Type>().value(row);
            u64::try_from(v).map_err(|_| invalid(v.to_string()))?
        }
        DataType::Float64 | DataType::Float32 => {
            let v = number_at(col, row, "id")?.unwrap_or(f64::NAN);
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                v as u64
            } else {
                bail!(invalid(v.to_string()));
            }
        }
        other => bail!(LoadError::ColumnType {
            column: "id",
            data_type: other.clone(),
        }),
    };
    Ok(id)
}

fn number_at(col: &ArrayRef, row: usize, name: &'static str) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        other => bail!(LoadError::ColumnType {
            column: name,
            data_type: other.clone(),
        }),
    };
    Ok(Some(value))
}

fn date_at(col: &ArrayRef, row: usize, row_no: usize) -> Result<Option<NaiveDate>> {
    if col.is_null(row) {
        return Ok(None);
    }
    if let Some(arr) = col.as_primitive_opt::<Date32Type>() {
        return Ok(arr.value_as_date(row));
    }
    let text = string_at(col, row, "last_review")?;
    Ok(coerce_date(row_no, text.as_deref())?)
}
