/// Summarizer: pure functions from a [`Dataset`](crate::data::model::Dataset)
/// to derived, read-only views. Nothing here performs I/O.
///
/// ```text
///   Dataset
///      │
///      ├── schema    infer_types, count_missing
///      ├── describe  count / mean / std / min / quartiles / max
///      ├── group     group_mean, group_describe (per category)
///      └── chart     histogram, correlation_matrix
/// ```

pub mod chart;
pub mod describe;
pub mod group;
pub mod schema;

pub use chart::{correlation_matrix, histogram, CorrelationMatrix, Histogram};
pub use describe::{describe, ColumnSummary, Divisor};
pub use group::{group_describe, group_mean, GroupAggregate};
pub use schema::{count_missing, infer_types, ColumnType};
