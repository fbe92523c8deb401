//! Error types for the sift-record crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while evaluating a query against a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The query used a comparison operator the matcher does not implement.
    #[error("unsupported operator '{operator}' on field '{field}'")]
    UnsupportedOperator {
        /// Field the comparison targeted (`*` for any field).
        field: String,
        /// The operator as written in the query.
        operator: String,
    },
}

/// Errors that can occur when loading records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Failed to read a record file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A top-level value or array element is not a JSON object.
    #[error("{path}: record {index} is not a JSON object")]
    NotAnObject {
        /// Path to the offending file.
        path: PathBuf,
        /// Position of the value in the file, 0 for a single top-level value.
        index: usize,
    },
}
