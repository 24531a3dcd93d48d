//! Error types for the SDK facade.

use tabcontract_core::{ContractError, ValidationResult};
use tabcontract_parser::ParserError;
use thiserror::Error;

/// Errors returned by the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Invalid input to one of the contract operations
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Reading or writing a contract failed
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// Validation ran but the dataset does not satisfy the contract
    #[error("Contract violated: {}", violation_counts(.0))]
    ContractViolation(Box<ValidationResult>),
}

impl SdkError {
    /// The failing validation result, for [`SdkError::ContractViolation`].
    pub fn violation(&self) -> Option<&ValidationResult> {
        match self {
            SdkError::ContractViolation(result) => Some(result.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;

fn violation_counts(result: &ValidationResult) -> String {
    let counts = result
        .counts_by_kind()
        .into_iter()
        .map(|(kind, count)| format!("{kind}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} issues ({})", result.issues().len(), counts)
}
