use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::LoadError;

/// Tokens read as a missing cell, in addition to empty or blank text.
pub const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "?"];

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell: a float, a text string, or missing.
/// Kept `Ord` so values can live in `BTreeSet`s.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Float(f64),
    Text(String),
    Missing,
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Missing => 0,
                Float(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

impl Value {
    /// Guess the type of a raw text cell. Any spelling of NaN (`NAN`, `-nan`,
    /// ...) is missing, the same as a null in a Parquet column.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => Value::Missing,
            Ok(v) => Value::Float(v),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// A NaN float counts as missing too.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(v) => v.is_nan(),
            Value::Text(_) => false,
        }
    }

    /// Interpret the value as an `f64`. Text is given a parse attempt so that
    /// numbers that arrived as strings still count as numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if v.is_nan() => None,
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Missing => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Record – one row
// ---------------------------------------------------------------------------

/// One observation: column name → value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Value of `column`, treating an absent field as missing.
    pub fn get(&self, column: &str) -> &Value {
        self.fields.get(column).unwrap_or(&Value::Missing)
    }

    pub fn has_missing(&self) -> bool {
        self.fields.values().any(Value::is_missing)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered sequence of records sharing one column set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Column names in source order.
    column_names: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from positional rows. Every row must have exactly one
    /// value per column and column names must be unique.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, LoadError> {
        let mut seen = BTreeSet::new();
        for name in &column_names {
            if !seen.insert(name.as_str()) {
                return Err(LoadError::Schema(format!("duplicate column '{name}'")));
            }
        }

        let mut records = Vec::with_capacity(rows.len());
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != column_names.len() {
                return Err(LoadError::Schema(format!(
                    "row {row_no} has {} fields, expected {}",
                    row.len(),
                    column_names.len()
                )));
            }
            let fields = column_names.iter().cloned().zip(row).collect();
            records.push(Record { fields });
        }

        Ok(Dataset {
            column_names,
            records,
        })
    }

    /// Build a dataset from keyed records. The column set is the union of
    /// all keys; a record lacking a column gets a missing value for it.
    /// `order` fixes the column order; keys not listed there follow sorted.
    pub fn from_records(order: &[String], mut records: Vec<Record>) -> Self {
        let mut all: BTreeSet<String> = BTreeSet::new();
        for rec in &records {
            all.extend(rec.fields.keys().cloned());
        }

        let mut column_names: Vec<String> =
            order.iter().filter(|c| all.contains(*c)).cloned().collect();
        for col in &all {
            if !column_names.contains(col) {
                column_names.push(col.clone());
            }
        }

        for rec in &mut records {
            for col in &column_names {
                rec.fields.entry(col.clone()).or_insert(Value::Missing);
            }
        }

        Dataset {
            column_names,
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.column_names
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// All values of one column, in record order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().map(move |r| r.get(column))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A new dataset with the same columns holding only the records at
    /// `indices`.
    pub fn select(&self, indices: &[usize]) -> Self {
        Dataset {
            column_names: self.column_names.clone(),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}
