use std::collections::BTreeMap;

use super::describe::{mean, summarize, ColumnSummary, Divisor};
use super::schema::{infer_types, numeric_columns, ColumnType};
use crate::data::filter::partition;
use crate::data::model::Dataset;
use crate::error::{SummaryError, SummaryResult};

/// Category → (numeric column → mean).
pub type GroupAggregate = BTreeMap<String, BTreeMap<String, f64>>;

/// Mean of every numeric column within each category of `group_column`.
///
/// Categories are the distinct non-missing values of `group_column` in
/// lexicographic order. The grouping column itself is left out even when it
/// is numeric. A category with no values for a column gets NaN there.
pub fn group_mean(dataset: &Dataset, group_column: &str) -> SummaryResult<GroupAggregate> {
    let groups = partition(dataset, group_column)?;
    let columns: Vec<String> = numeric_columns(dataset)?
        .into_iter()
        .filter(|c| c != group_column)
        .collect();

    Ok(groups
        .into_iter()
        .map(|(category, rows)| {
            let means = columns
                .iter()
                .map(|col| {
                    let values: Vec<f64> = rows
                        .iter()
                        .filter_map(|&i| dataset.records()[i].get(col).as_f64())
                        .collect();
                    (col.clone(), mean(&values))
                })
                .collect();
            (category, means)
        })
        .collect())
}

/// Descriptive statistics of `value_column` within each category of
/// `group_column`. These are the numbers behind a grouped boxplot.
///
/// A category with no values for `value_column` has nothing to box and is
/// left out of the result, so the keys may be a subset of `group_mean`'s.
pub fn group_describe(
    dataset: &Dataset,
    group_column: &str,
    value_column: &str,
    divisor: Divisor,
) -> SummaryResult<BTreeMap<String, ColumnSummary>> {
    let groups = partition(dataset, group_column)?;
    match infer_types(dataset)?.get(value_column) {
        None => {
            return Err(SummaryError::UnknownColumn {
                column: value_column.to_string(),
            })
        }
        Some(ColumnType::Categorical) => {
            return Err(SummaryError::NonNumericColumn {
                column: value_column.to_string(),
            })
        }
        Some(ColumnType::Numeric) => {}
    }

    let mut boxes = BTreeMap::new();
    for (category, rows) in groups {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|&i| dataset.records()[i].get(value_column).as_f64())
            .collect();
        if values.is_empty() {
            continue;
        }
        boxes.insert(category, summarize(value_column, &values, divisor)?);
    }
    Ok(boxes)
}
