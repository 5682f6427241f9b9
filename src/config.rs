use clap::{Parser, ValueEnum};

use crate::data::loader::{HeaderMode, LoadOptions};
use crate::report::ReportSettings;
use crate::summary::Divisor;

/// Where the script has always fetched the data from.
pub const IRIS_URL: &str = "https://archive.ics.uci.edu/ml/machine-learning-databases/iris/iris.data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "iris-summary")]
#[command(version)]
#[command(about = "Descriptive statistics and grouped means for a CSV table")]
#[command(long_about = "Loads a comma-separated table (the Iris dataset by default) and prints,
in order: column data types, summary statistics, missing-value counts,
per-category means and the correlation matrix.

EXAMPLES:
  # Fetch the UCI iris data and summarize it
  iris-summary

  # Local file with a header row, grouped by another column
  iris-summary data/penguins.csv --group-by island

  # Machine-readable output including histogram and boxplot numbers
  iris-summary iris.data --format json")]
pub struct Cli {
    /// Path or http(s) URL of the table (.csv/.data/.txt, .json, .parquet)
    #[arg(value_name = "SOURCE", env = "IRIS_SUMMARY_SOURCE", default_value = IRIS_URL)]
    pub source: String,

    /// Categorical column to group by
    #[arg(short, long, env = "IRIS_SUMMARY_GROUP_BY", default_value = "species")]
    pub group_by: String,

    /// Whether the first CSV row holds column names
    #[arg(long, value_enum, env = "IRIS_SUMMARY_HEADER", default_value_t = HeaderMode::Auto)]
    pub header: HeaderMode,

    /// Comma-separated column names, overriding the header
    #[arg(long, value_delimiter = ',', env = "IRIS_SUMMARY_NAMES")]
    pub names: Option<Vec<String>>,

    /// Drop every row with a missing field before summarizing
    #[arg(long, env = "IRIS_SUMMARY_DROP_MISSING")]
    pub drop_missing: bool,

    /// Use the population (n) divisor for standard deviation instead of n-1
    #[arg(long, env = "IRIS_SUMMARY_POPULATION_STD")]
    pub population_std: bool,

    /// Output format
    #[arg(short, long, value_enum, env = "IRIS_SUMMARY_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Numeric column used for the histogram and per-category boxplot data
    #[arg(long, env = "IRIS_SUMMARY_HISTOGRAM_COLUMN", default_value = "sepal_length")]
    pub histogram_column: String,

    /// Number of histogram bins
    #[arg(long, env = "IRIS_SUMMARY_BINS", default_value_t = 10,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub bins: u16,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            header: self.header,
            names: self.names.clone(),
        }
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            group_column: self.group_by.clone(),
            divisor: if self.population_std {
                Divisor::Population
            } else {
                Divisor::Sample
            },
            chart_column: self.histogram_column.clone(),
            bins: usize::from(self.bins),
        }
    }
}
