use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading errors
// ---------------------------------------------------------------------------

/// Errors raised while locating or decoding a tabular source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist or the URL could not be fetched.
    #[error("source not found: {source_name} ({reason})")]
    SourceNotFound { source_name: String, reason: String },

    /// The table header or a row does not fit a rectangular schema.
    #[error("malformed schema: {0}")]
    Schema(String),

    /// Extension we do not know how to read.
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Summary errors
// ---------------------------------------------------------------------------

/// Errors raised by the pure summarization functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    /// The dataset has no columns.
    #[error("dataset has no columns")]
    Schema,

    /// A numeric column has no non-missing values, so mean/std are undefined.
    #[error("column '{column}' has no non-missing values")]
    EmptyColumn { column: String },

    /// The requested column is not part of the schema.
    #[error("column '{column}' not found")]
    UnknownColumn { column: String },

    /// A numeric operation was requested on a categorical column.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
