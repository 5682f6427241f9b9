use std::collections::BTreeMap;

use serde::Serialize;

use super::schema::{column_f64, numeric_columns};
use crate::data::model::Dataset;
use crate::error::{SummaryError, SummaryResult};

/// Divisor used for the variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Divisor {
    /// `n - 1`
    #[default]
    Sample,
    /// `n`
    Population,
}

impl Divisor {
    fn ddof(self) -> usize {
        match self {
            Divisor::Sample => 1,
            Divisor::Population => 0,
        }
    }
}

/// Descriptive statistics for one numeric column, over non-missing entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Summarize every numeric column.
pub fn describe(dataset: &Dataset, divisor: Divisor) -> SummaryResult<BTreeMap<String, ColumnSummary>> {
    numeric_columns(dataset)?
        .into_iter()
        .map(|col| -> SummaryResult<(String, ColumnSummary)> {
            let summary = summarize(&col, &column_f64(dataset, &col), divisor)?;
            Ok((col, summary))
        })
        .collect()
}

/// Summarize a slice of values. `column` only labels the error.
pub fn summarize(column: &str, values: &[f64], divisor: Divisor) -> SummaryResult<ColumnSummary> {
    if values.is_empty() {
        return Err(SummaryError::EmptyColumn {
            column: column.to_string(),
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(values);
    Ok(ColumnSummary {
        count: values.len(),
        mean,
        std: variance(values, mean, divisor).sqrt(),
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// NaN when there are no degrees of freedom left.
fn variance(values: &[f64], mean: f64, divisor: Divisor) -> f64 {
    let n = values.len();
    if n <= divisor.ddof() {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    ss / (n - divisor.ddof()) as f64
}

/// Quantile of already sorted values, linearly interpolated between the
/// order statistics around position `p * (n - 1)`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use approx::assert_abs_diff_eq;

    fn single(values: &[f64]) -> Dataset {
        Dataset::from_rows(
            vec!["x".into()],
            values.iter().map(|&v| vec![Value::Float(v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn describe_one_to_five() {
        let stats = describe(&single(&[1.0, 2.0, 3.0, 4.0, 5.0]), Divisor::Sample).unwrap();
        let s = &stats["x"];
        assert_eq!(s.count, 5);
        assert_abs_diff_eq!(s.mean, 3.0);
        assert_abs_diff_eq!(s.std, 1.5811388, epsilon = 1e-6);
        assert_abs_diff_eq!(s.min, 1.0);
        assert_abs_diff_eq!(s.q25, 2.0);
        assert_abs_diff_eq!(s.median, 3.0);
        assert_abs_diff_eq!(s.q75, 4.0);
        assert_abs_diff_eq!(s.max, 5.0);
    }

    #[test]
    fn population_divisor() {
        let stats = describe(&single(&[1.0, 2.0, 3.0, 4.0, 5.0]), Divisor::Population).unwrap();
        assert_abs_diff_eq!(stats["x"].std, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn quartiles_interpolate() {
        let s = summarize("x", &[4.0, 1.0, 3.0, 2.0], Divisor::Sample).unwrap();
        assert_abs_diff_eq!(s.q25, 1.75);
        assert_abs_diff_eq!(s.median, 2.5);
        assert_abs_diff_eq!(s.q75, 3.25);
    }

    #[test]
    fn single_value_sample_std_is_nan() {
        let s = summarize("x", &[7.0], Divisor::Sample).unwrap();
        assert!(s.std.is_nan());
        assert_abs_diff_eq!(s.median, 7.0);

        let s = summarize("x", &[7.0], Divisor::Population).unwrap();
        assert_abs_diff_eq!(s.std, 0.0);
    }

    #[test]
    fn missing_values_are_ignored() {
        let ds = Dataset::from_rows(
            vec!["x".into()],
            vec![vec![1.0.into()], vec![Value::Missing], vec![3.0.into()]],
        )
        .unwrap();
        let s = &describe(&ds, Divisor::Sample).unwrap()["x"];
        assert_eq!(s.count, 2);
        assert_abs_diff_eq!(s.mean, 2.0);
    }

    #[test]
    fn all_missing_column_is_empty_error() {
        let ds = Dataset::from_rows(
            vec!["x".into()],
            vec![vec![Value::Missing], vec![Value::Missing]],
        )
        .unwrap();
        assert_eq!(
            describe(&ds, Divisor::Sample),
            Err(SummaryError::EmptyColumn { column: "x".into() })
        );
    }

    #[test]
    fn categorical_columns_are_skipped() {
        let ds = Dataset::from_rows(
            vec!["x".into(), "label".into()],
            vec![vec![1.0.into(), "a".into()], vec![2.0.into(), "b".into()]],
        )
        .unwrap();
        let stats = describe(&ds, Divisor::Sample).unwrap();
        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["x"]);
    }
}
