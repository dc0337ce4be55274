//! Error types for model operations.
//!
//! This module provides the `ModelError` enum returned by every fallible
//! operation of [`crate::model::ClickHouseModel`].

use crate::executor::ClickHouseError;

/// Error type for model operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Values of a different kind were applied to a column
    MismatchingDataType { column: String },
    /// A column holds a different number of rows than the first non-empty column
    MismatchingRowCount { count: usize, expected: usize },
    /// The executor failed
    Database(ClickHouseError),
    /// The model could not be encoded
    Encode(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::MismatchingDataType { column } => {
                write!(f, "Mismatching data type for column {}", column)
            }
            ModelError::MismatchingRowCount { count, expected } => write!(
                f,
                "Mismatching row count: column has {} rows, expected {}",
                count, expected
            ),
            ModelError::Database(err) => write!(f, "Database error: {}", err),
            ModelError::Encode(msg) => write!(f, "Encode error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClickHouseError> for ModelError {
    fn from(err: ClickHouseError) -> Self {
        ModelError::Database(err)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Encode(err.to_string())
    }
}
