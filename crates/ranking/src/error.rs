//! Error types for the ranking crate.

use thiserror::Error;

/// Invalid query configuration supplied by a caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Metric selector was neither "average" nor "median"
    #[error("Unknown metric '{0}' (expected \"average\" or \"median\")")]
    UnknownMetric(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
