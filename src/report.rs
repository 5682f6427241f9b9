use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::{SummaryError, SummaryResult};
use crate::summary::{
    correlation_matrix, count_missing, describe, group_describe, group_mean, histogram,
    infer_types, ColumnSummary, ColumnType, CorrelationMatrix, Divisor, GroupAggregate, Histogram,
};

// ---------------------------------------------------------------------------
// Report settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub group_column: String,
    pub divisor: Divisor,
    /// Column binned for the histogram and boxed per category.
    pub chart_column: String,
    pub bins: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            group_column: "species".to_string(),
            divisor: Divisor::Sample,
            chart_column: "sepal_length".to_string(),
            bins: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the exploration prints, plus the numbers behind its charts.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: usize,
    pub columns: Vec<String>,
    pub dtypes: BTreeMap<String, ColumnType>,
    pub summary: BTreeMap<String, ColumnSummary>,
    pub missing: BTreeMap<String, usize>,
    pub group_column: String,
    pub group_means: GroupAggregate,
    pub correlation: CorrelationMatrix,
    /// Absent when the chart column is not in the dataset.
    pub histogram: Option<Histogram>,
    pub group_boxes: Option<BTreeMap<String, ColumnSummary>>,
}

impl Report {
    pub fn build(dataset: &Dataset, settings: &ReportSettings) -> SummaryResult<Self> {
        let dtypes = infer_types(dataset)?;
        let summary = describe(dataset, settings.divisor)?;
        let group_means = group_mean(dataset, &settings.group_column)?;
        let correlation = correlation_matrix(dataset)?;

        let (histogram, group_boxes) = if dtypes.get(&settings.chart_column) == Some(&ColumnType::Numeric) {
            let histogram = match histogram(dataset, &settings.chart_column, settings.bins) {
                Ok(h) => Some(h),
                Err(SummaryError::EmptyColumn { column }) => {
                    debug!("column '{column}' has no finite values, skipping histogram");
                    None
                }
                Err(e) => return Err(e),
            };
            let boxes = group_describe(
                dataset,
                &settings.group_column,
                &settings.chart_column,
                settings.divisor,
            )?;
            (histogram, Some(boxes))
        } else {
            debug!("no numeric column '{}', skipping chart data", settings.chart_column);
            (None, None)
        };

        Ok(Report {
            rows: dataset.len(),
            columns: dataset.columns().to_vec(),
            dtypes,
            summary,
            missing: count_missing(dataset),
            group_column: settings.group_column.clone(),
            group_means,
            correlation,
            histogram,
            group_boxes,
        })
    }

    /// Numeric columns in source order.
    fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| self.summary.contains_key(*c))
            .map(String::as_str)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Plain text in a fixed order: dtypes, summary statistics, missing counts,
/// grouped means, correlations.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self.columns.iter().map(String::len).max().unwrap_or(0) + 2;
        let numeric = self.numeric_columns();

        writeln!(f, "Data Types of Columns:")?;
        for col in &self.columns {
            let dtype = self.dtypes.get(col).map(ToString::to_string).unwrap_or_default();
            writeln!(f, "{col:<name_width$}{dtype}")?;
        }

        writeln!(f, "\nSummary Statistics:")?;
        let stat_rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];
        let rows: Vec<(String, Vec<f64>)> = stat_rows
            .iter()
            .map(|(label, get)| {
                let vals = numeric.iter().map(|c| get(&self.summary[*c])).collect();
                (label.to_string(), vals)
            })
            .collect();
        write_table(f, &numeric, &rows, 6)?;

        writeln!(f, "\nChecking for Missing Values:")?;
        for col in &self.columns {
            let n = self.missing.get(col).copied().unwrap_or(0);
            writeln!(f, "{col:<name_width$}{n}")?;
        }

        writeln!(f, "\nMean by {}:", self.group_column)?;
        let mean_cols: Vec<&str> = numeric
            .iter()
            .copied()
            .filter(|c| *c != self.group_column)
            .collect();
        let rows: Vec<(String, Vec<f64>)> = self
            .group_means
            .iter()
            .map(|(category, means)| {
                let vals = mean_cols
                    .iter()
                    .map(|c| means.get(*c).copied().unwrap_or(f64::NAN))
                    .collect();
                (category.clone(), vals)
            })
            .collect();
        write_table(f, &mean_cols, &rows, 6)?;

        writeln!(f, "\nCorrelation Matrix:")?;
        let corr_cols: Vec<&str> = self.correlation.columns.iter().map(String::as_str).collect();
        let rows: Vec<(String, Vec<f64>)> = self
            .correlation
            .columns
            .iter()
            .cloned()
            .zip(self.correlation.values.iter().cloned())
            .collect();
        write_table(f, &corr_cols, &rows, 2)
    }
}

/// Right-aligned table with a left-aligned label column.
fn write_table(
    out: &mut impl fmt::Write,
    headers: &[&str],
    rows: &[(String, Vec<f64>)],
    precision: usize,
) -> fmt::Result {
    let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let cell_width = |h: &str| h.len().max(precision + 6);

    write!(out, "{:label_width$}", "")?;
    for h in headers {
        let w = cell_width(h);
        write!(out, "  {h:>w$}")?;
    }
    writeln!(out)?;

    for (label, values) in rows {
        write!(out, "{label:<label_width$}")?;
        for (h, v) in headers.iter().zip(values) {
            let w = cell_width(h);
            write!(out, "  {v:>w$.precision$}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
