use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::model::{Dataset, Value};
use crate::error::{SummaryError, SummaryResult};

// ---------------------------------------------------------------------------
// Column types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    /// Printed with the dtype names people expect from a data-frame dump.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "float64"),
            ColumnType::Categorical => write!(f, "object"),
        }
    }
}

/// Classify every column. A column is numeric iff each of its non-missing
/// values parses as a float; an all-missing column is numeric too.
pub fn infer_types(dataset: &Dataset) -> SummaryResult<BTreeMap<String, ColumnType>> {
    if dataset.columns().is_empty() {
        return Err(SummaryError::Schema);
    }

    Ok(dataset
        .columns()
        .iter()
        .map(|col| {
            let numeric = dataset
                .column_values(col)
                .filter(|v| !v.is_missing())
                .all(|v| v.as_f64().is_some());
            let kind = if numeric {
                ColumnType::Numeric
            } else {
                ColumnType::Categorical
            };
            (col.clone(), kind)
        })
        .collect())
}

/// Numeric column names in source order.
pub fn numeric_columns(dataset: &Dataset) -> SummaryResult<Vec<String>> {
    let types = infer_types(dataset)?;
    Ok(dataset
        .columns()
        .iter()
        .filter(|c| types.get(*c) == Some(&ColumnType::Numeric))
        .cloned()
        .collect())
}

/// Count missing entries per column.
pub fn count_missing(dataset: &Dataset) -> BTreeMap<String, usize> {
    dataset
        .columns()
        .iter()
        .map(|col| {
            let n = dataset.column_values(col).filter(|v| v.is_missing()).count();
            (col.clone(), n)
        })
        .collect()
}

/// Non-missing values of a column read as floats. Values that do not parse
/// are skipped; callers check the column type first.
pub(crate) fn column_f64(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column_values(column)
        .filter_map(Value::as_f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str, cells: &[Value]) -> Dataset {
        Dataset::from_rows(
            vec![name.to_string()],
            cells.iter().map(|c| vec![c.clone()]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn text_column_is_categorical() {
        let ds = single("c", &["a".into(), "b".into(), "c".into()]);
        assert_eq!(infer_types(&ds).unwrap()["c"], ColumnType::Categorical);
    }

    #[test]
    fn numeric_strings_are_numeric() {
        let ds = single("n", &["1.0".into(), "2.5".into()]);
        assert_eq!(infer_types(&ds).unwrap()["n"], ColumnType::Numeric);
    }

    #[test]
    fn missing_values_do_not_affect_type() {
        let ds = single("n", &[1.0.into(), Value::Missing, 3.0.into()]);
        assert_eq!(infer_types(&ds).unwrap()["n"], ColumnType::Numeric);

        let ds = single("m", &[1.0.into(), Value::Missing, "x".into()]);
        assert_eq!(infer_types(&ds).unwrap()["m"], ColumnType::Categorical);
    }

    #[test]
    fn zero_columns_is_schema_error() {
        assert_eq!(infer_types(&Dataset::default()), Err(SummaryError::Schema));
    }

    #[test]
    fn count_missing_per_column() {
        let ds = Dataset::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![1.0.into(), Value::Missing],
                vec![Value::Missing, Value::Missing],
                vec![3.0.into(), "x".into()],
            ],
        )
        .unwrap();
        let missing = count_missing(&ds);
        assert_eq!(missing["a"], 1);
        assert_eq!(missing["b"], 2);
    }

    #[test]
    fn complete_dataset_has_no_missing() {
        let ds = Dataset::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![1.0.into(), "x".into()], vec![2.0.into(), "y".into()]],
        )
        .unwrap();
        assert!(count_missing(&ds).values().all(|&n| n == 0));
    }

    #[test]
    fn numeric_columns_keep_source_order() {
        let ds = Dataset::from_rows(
            vec!["z".into(), "label".into(), "a".into()],
            vec![vec![1.0.into(), "x".into(), 2.0.into()]],
        )
        .unwrap();
        assert_eq!(numeric_columns(&ds).unwrap(), vec!["z".to_string(), "a".to_string()]);
    }
}
