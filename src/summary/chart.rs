use serde::Serialize;

use super::describe::mean;
use super::schema::{column_f64, infer_types, numeric_columns, ColumnType};
use crate::data::model::Dataset;
use crate::error::{SummaryError, SummaryResult};

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bin counts. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin the finite values of a numeric column over `[min, max]`; infinities
/// have no bin and are not counted.
/// Every bin is half-open except the last, which includes `max`. A constant
/// column is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram(dataset: &Dataset, column: &str, bins: usize) -> SummaryResult<Histogram> {
    if bins == 0 {
        return Err(SummaryError::InvalidArgument(
            "histogram needs at least one bin".to_string(),
        ));
    }
    require_numeric(dataset, column)?;

    let values: Vec<f64> = column_f64(dataset, column)
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return Err(SummaryError::EmptyColumn {
            column: column.to_string(),
        });
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(Histogram {
        column: column.to_string(),
        edges,
        counts,
    })
}

fn require_numeric(dataset: &Dataset, column: &str) -> SummaryResult<()> {
    match infer_types(dataset)?.get(column) {
        Some(ColumnType::Numeric) => Ok(()),
        Some(ColumnType::Categorical) => Err(SummaryError::NonNumericColumn {
            column: column.to_string(),
        }),
        None => Err(SummaryError::UnknownColumn {
            column: column.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square Pearson correlation matrix over the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Pairwise Pearson correlation, each pair computed over the rows where both
/// values are present. NaN where fewer than two such rows exist or either
/// side has zero variance.
pub fn correlation_matrix(dataset: &Dataset) -> SummaryResult<CorrelationMatrix> {
    let columns = numeric_columns(dataset)?;
    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
                .records()
                .iter()
                .filter_map(|r| Some((r.get(&columns[i]).as_f64()?, r.get(&columns[j]).as_f64()?)))
                .unzip();
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}
