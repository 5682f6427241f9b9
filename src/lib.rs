//! # iris-summary
//!
//! Descriptive statistics and grouped aggregation over a small table,
//! by default the Iris flower dataset.
//!
//! - [`data`] — loading (CSV, JSON, Parquet, URL), the `Dataset` model, row filters
//! - [`summary`] — type inference, missing counts, describe, group means, chart data
//! - [`report`] — the fixed-order text report and its JSON form
//! - [`config`] — command-line / environment configuration
//! - [`error`] — error types
//!
//! ```
//! use iris_summary::data::loader::{read_csv, LoadOptions};
//! use iris_summary::summary::{describe, group_mean, Divisor};
//!
//! let csv = "5.1,3.5,1.4,0.2,setosa\n7.0,3.2,4.7,1.4,versicolor\n";
//! let ds = read_csv(csv.as_bytes(), &LoadOptions::default()).unwrap();
//!
//! let stats = describe(&ds, Divisor::Sample).unwrap();
//! assert_eq!(stats["sepal_length"].count, 2);
//!
//! let means = group_mean(&ds, "species").unwrap();
//! assert_eq!(means["setosa"]["petal_width"], 0.2);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod summary;
