use std::collections::BTreeMap;

use log::warn;

use super::model::Dataset;
use crate::error::{SummaryError, SummaryResult};

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Return a new dataset without any record that has a missing field.
/// The input is left untouched.
pub fn drop_missing(dataset: &Dataset) -> Dataset {
    let kept: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| !rec.has_missing())
        .map(|(i, _)| i)
        .collect();

    let dropped = dataset.len() - kept.len();
    if dropped > 0 {
        warn!("dropped {dropped} of {} records with missing fields", dataset.len());
    }
    dataset.select(&kept)
}

/// Partition record indices by the value of `group_column`.
///
/// Keys are the display form of each distinct non-missing value, ordered
/// lexicographically. A record whose grouping value is missing lands in no
/// partition.
pub fn partition(dataset: &Dataset, group_column: &str) -> SummaryResult<BTreeMap<String, Vec<usize>>> {
    if !dataset.has_column(group_column) {
        return Err(SummaryError::UnknownColumn {
            column: group_column.to_string(),
        });
    }

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, value) in dataset.column_values(group_column).enumerate() {
        if value.is_missing() {
            continue;
        }
        groups.entry(value.to_string()).or_default().push(i);
    }
    Ok(groups)
}
