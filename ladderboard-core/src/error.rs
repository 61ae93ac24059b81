use thiserror::Error;

/// Reasons a single results file is excluded from the unified table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no timestamp directory two levels above it")]
    MissingTimestampDir { path: String },
    #[error("timestamp directory {dir:?} does not match format {format:?}: {source}")]
    Timestamp {
        dir: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{path} row {row}: expected {expected} fields, found {found}")]
    TooManyFields {
        path: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{path} is missing required column {column:?}")]
    MissingColumn { path: String, column: String },
    #[error("{path} row {row}: invalid success value {value:?}")]
    InvalidSuccess {
        path: String,
        row: usize,
        value: String,
    },
}

/// A success cell that is neither a recognised flag nor a number in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised success value {0:?}")]
pub struct SuccessParseError(pub String);
