//! Error types for data contracts.
//!
//! This module defines every error that can be raised while building,
//! checking or consuming a contract. Data-content violations found while
//! validating a dataset are *not* errors; they are reported as
//! [`Issue`](crate::Issue) values instead.

use thiserror::Error;

/// Result type for data contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Broad classification of a [`ContractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input has the wrong shape or kind (unknown column type, value of
    /// the wrong class, broken rule invariant).
    Type,
    /// The input is well-typed but semantically invalid (fraction outside
    /// [0, 1], inverted bounds, non-positive weight).
    Value,
}

/// Main error type for data contract operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// Declared column type is not part of the supported dtype set
    #[error("Unsupported type '{type_name}' for column '{column}'")]
    UnsupportedType {
        /// Column name
        column: String,
        /// Raw type tag reported by the data source
        type_name: String,
    },

    /// Column does not exist in the data source
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Numeric statistics were requested for a non-numeric column
    #[error("Column '{column}' is not numeric (declared as '{type_name}')")]
    NotNumeric {
        /// Column name
        column: String,
        /// Raw type tag reported by the data source
        type_name: String,
    },

    /// A value in a dataset column does not fit the column's declared type
    #[error("Invalid value in column '{column}' at row {row}: expected {expected}, got {actual}")]
    ValueTypeMismatch {
        /// Column name
        column: String,
        /// Row index
        row: usize,
        /// Expected value class
        expected: String,
        /// Actual value class
        actual: String,
    },

    /// Column rule breaks the bounds / allowed values invariant
    #[error("Malformed rule for column '{column}': {message}")]
    MalformedRule {
        /// Column name
        column: String,
        /// Description of the problem
        message: String,
    },

    /// Missing fraction is not a finite number in [0, 1]
    #[error("max_missing_frac for column '{column}' must be between 0 and 1, got {value}")]
    InvalidMissingFraction {
        /// Column name
        column: String,
        /// Offending value
        value: f64,
    },

    /// Lower bound is above the upper bound
    #[error("min_value cannot exceed max_value for column '{column}': {min} > {max}")]
    InvertedBounds {
        /// Column name
        column: String,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Column name already present
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Dataset columns have different lengths
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        /// Column name
        column: String,
        /// Row count of the first column
        expected: usize,
        /// Row count of this column
        actual: usize,
    },

    /// Requested number of top issues is zero
    #[error("top_k must be a positive integer, got {0}")]
    InvalidTopK(usize),

    /// Severity weight is not a positive number
    #[error("Weight for '{kind}' must be positive, got {weight}")]
    InvalidWeight {
        /// Issue kind
        kind: String,
        /// Offending weight
        weight: f64,
    },
}

impl ContractError {
    /// Returns whether this is a type error or a value error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ContractError::UnsupportedType { .. }
            | ContractError::UnknownColumn(_)
            | ContractError::NotNumeric { .. }
            | ContractError::ValueTypeMismatch { .. }
            | ContractError::MalformedRule { .. } => ErrorClass::Type,
            ContractError::InvalidMissingFraction { .. }
            | ContractError::InvertedBounds { .. }
            | ContractError::DuplicateColumn(_)
            | ContractError::RaggedColumns { .. }
            | ContractError::InvalidTopK(_)
            | ContractError::InvalidWeight { .. } => ErrorClass::Value,
        }
    }

    /// Returns true for structurally wrong inputs.
    pub fn is_type_error(&self) -> bool {
        self.class() == ErrorClass::Type
    }

    /// Returns true for semantically invalid inputs.
    pub fn is_value_error(&self) -> bool {
        self.class() == ErrorClass::Value
    }

    /// Creates a new malformed rule error.
    pub fn malformed(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRule {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates a new unsupported type error.
    pub fn unsupported_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(ContractError::UnknownColumn("a".into()).is_type_error());
        assert!(ContractError::malformed("a", "both bounds and values").is_type_error());
        assert!(ContractError::InvalidTopK(0).is_value_error());
        assert!(
            ContractError::InvertedBounds {
                column: "a".into(),
                min: 2.0,
                max: 1.0,
            }
            .is_value_error()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ContractError::unsupported_type("tags", "list<utf8>");
        assert_eq!(
            err.to_string(),
            "Unsupported type 'list<utf8>' for column 'tags'"
        );

        let err = ContractError::InvalidWeight {
            kind: "range".into(),
            weight: -1.0,
        };
        assert_eq!(err.to_string(), "Weight for 'range' must be positive, got -1");
    }
}
