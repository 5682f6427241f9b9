use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record, Value};
use crate::error::LoadError;

/// Column names used when a five-column table arrives without a header.
pub const IRIS_COLUMNS: [&str; 5] = [
    "sepal_length",
    "sepal_width",
    "petal_length",
    "petal_width",
    "species",
];

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How to treat the first CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HeaderMode {
    /// Header iff the first row is all text and the second row has a number.
    #[default]
    Auto,
    Present,
    Absent,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub header: HeaderMode,
    /// Explicit column names; overrides both the header row and defaults.
    pub names: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a path or an `http(s)://` URL.
///
/// Supported formats (by extension, for paths):
/// * `.csv`, `.data`, `.txt`, none – comma-separated, header optional
/// * `.json`    – `[{ "sepal_length": 5.1, ..., "species": "setosa" }, ...]`
/// * `.parquet` – flat table of numeric / string / boolean columns
///
/// URLs are always read as CSV.
pub fn load_source(source: &str, options: &LoadOptions) -> Result<Dataset> {
    let dataset = if is_url(source) {
        let body = fetch_url(source)?;
        read_csv(body.as_bytes(), options).with_context(|| format!("parsing CSV from {source}"))?
    } else {
        load_file(Path::new(source), options)?
    };

    info!(
        "loaded {} records x {} columns from {source}",
        dataset.len(),
        dataset.columns().len()
    );
    Ok(dataset)
}

/// Load a dataset from a local file. Dispatch by extension.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound {
            source_name: path.display().to_string(),
            reason: "no such file".to_string(),
        }
        .into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    debug!("reading {} as '{ext}'", path.display());

    match ext.as_str() {
        "" | "csv" | "data" | "txt" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file, options).with_context(|| format!("parsing CSV {}", path.display()))
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string()).into()),
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch_url(url: &str) -> Result<String> {
    let not_found = |reason: String| LoadError::SourceNotFound {
        source_name: url.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("iris-summary/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building HTTP client")?;

    debug!("GET {url}");
    let response = client.get(url).send().map_err(|e| not_found(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(not_found(format!("HTTP {status}")).into());
    }
    response.text().context("reading response body")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse comma-separated text. Blank lines are skipped; every remaining row
/// must have as many fields as the first one.
pub fn read_csv<R: Read>(source: R, options: &LoadOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record);
    }

    let Some(first) = rows.first() else {
        return Err(LoadError::Schema("no header or data rows".to_string()).into());
    };
    let width = first.len();

    let has_header = match options.header {
        HeaderMode::Present => true,
        HeaderMode::Absent => false,
        HeaderMode::Auto => detect_header(first, rows.get(1)),
    };
    debug!("CSV header detected: {has_header}");

    let header_names: Option<Vec<String>> =
        has_header.then(|| first.iter().map(str::to_string).collect());
    let data_rows = if has_header { &rows[1..] } else { &rows[..] };

    let column_names = match (&options.names, header_names) {
        (Some(names), _) => {
            if names.len() != width {
                return Err(LoadError::Schema(format!(
                    "{} column names given for {width} columns",
                    names.len()
                ))
                .into());
            }
            names.clone()
        }
        (None, Some(names)) => names,
        (None, None) => default_names(width),
    };

    let values: Vec<Vec<Value>> = data_rows
        .iter()
        .map(|rec| rec.iter().map(Value::parse).collect())
        .collect();

    Ok(Dataset::from_rows(column_names, values)?)
}

fn detect_header(first: &csv::StringRecord, second: Option<&csv::StringRecord>) -> bool {
    let all_text = first
        .iter()
        .all(|f| matches!(Value::parse(f), Value::Text(_)));
    if !all_text {
        return false;
    }
    match second {
        None => true,
        Some(rec) => rec
            .iter()
            .any(|f| matches!(Value::parse(f), Value::Float(_))),
    }
}

/// Iris names for five columns, positional names otherwise.
pub fn default_names(width: usize) -> Vec<String> {
    if width == IRIS_COLUMNS.len() {
        IRIS_COLUMNS.iter().map(|s| s.to_string()).collect()
    } else {
        (0..width).map(|i| format!("column_{i}")).collect()
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "sepal_length": 5.1, "sepal_width": 3.5, "species": "setosa" },
///   ...
/// ]
/// ```
///
/// Columns come out in key order; an object missing a key gets a missing
/// value for it.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    let mut order: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            if !order.contains(key) {
                order.push(key.clone());
            }
            fields.insert(key.clone(), json_to_value(val));
        }
        records.push(Record { fields });
    }

    if order.is_empty() {
        return Err(LoadError::Schema("JSON records have no fields".to_string()).into());
    }
    Ok(Dataset::from_records(&order, records))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::Number(n) => n.as_f64().map(Value::Float).unwrap_or(Value::Missing),
        JsonValue::String(s) => match Value::parse(s) {
            Value::Missing => Value::Missing,
            _ => Value::Text(s.trim().to_string()),
        },
        JsonValue::Null => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let values = batch
                .columns()
                .iter()
                .zip(&column_names)
                .map(|(col, name)| {
                    extract_value(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{name}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(values);
        }
    }

    Ok(Dataset::from_rows(column_names, rows)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Missing);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Float(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Value::Float(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Text(col.as_boolean().value(row).to_string()),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(match value {
        Value::Float(v) if v.is_nan() => Value::Missing,
        v => v,
    })
}
