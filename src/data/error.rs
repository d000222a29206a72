//! Errors raised while building a [`Dataset`](super::model::Dataset).
//!
//! Filtering and aggregation never fail on a valid dataset, so this enum only
//! covers construction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// A row lacks a key for one of the declared columns.
    #[error("row {row} is missing column '{column}'")]
    SchemaMismatch { row: usize, column: String },

    /// The same column name was declared twice.
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },
}

/// Result type for dataset construction.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::SchemaMismatch {
            row: 3,
            column: "city".into(),
        };
        assert_eq!(err.to_string(), "row 3 is missing column 'city'");
    }
}
