//! Error types for loading MovieLens CSV files.
//!
//! Two kinds of failure live here:
//! - the whole file is missing or unreadable (`SourceUnavailable`)
//! - one row is malformed (every other variant)
//!
//! Row errors never escape [`crate::open_rows`]; they are logged and the row is
//! skipped. Only `SourceUnavailable` reaches callers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The dataset file could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row that could not be turned into a record
    #[error("{file}, row {line}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A column held a value outside what the field accepts
    #[error("bad {field} value {value:?}")]
    InvalidValue { field: String, value: String },

    /// The row split into the wrong number of columns
    #[error("row {line}: expected {expected} columns, got {found}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },
}

impl DataLoadError {
    /// True when the whole dataset is missing rather than one row being bad
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, DataLoadError::SourceUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
