//! # Tabular Data Contracts SDK
//!
//! Public API for tabular data contracts: infer a baseline contract from a
//! dataset, validate new snapshots against it, compare contracts over time,
//! and rank the issues found.
//!
//! ## Example
//!
//! ```rust
//! use tabcontract_sdk::{
//!     compare_contracts, infer_contract, summarize_violations, validate_contract, Column,
//!     DataSet, SummaryOptions,
//! };
//!
//! let baseline = DataSet::new(vec![
//!     Column::int("age", [Some(25), Some(40), Some(31)]),
//!     Column::string("city", ["NYC", "SF", "LA"].map(Some)),
//! ])
//! .unwrap();
//! let contract = infer_contract(&baseline).unwrap();
//!
//! let snapshot = DataSet::new(vec![
//!     Column::int("age", [Some(25), Some(150), Some(30)]),
//!     Column::string("city", ["NYC", "Paris", "LA"].map(Some)),
//! ])
//! .unwrap();
//! let result = validate_contract(&snapshot, &contract, true).unwrap();
//! let summary = summarize_violations(&result, &SummaryOptions::default()).unwrap();
//! assert_eq!(summary.total_issues(), 2);
//!
//! let drift = compare_contracts(&contract, &infer_contract(&snapshot).unwrap()).unwrap();
//! assert!(drift.range_changes.contains("age"));
//! ```

mod error;
mod files;

pub use error::*;
pub use files::*;

pub use tabcontract_core::{
    ColumnRule, ColumnRuleBuilder, Contract, ContractBuilder, ContractError, DType, DriftReport,
    ErrorClass, Evidence, Issue, IssueKind, SeverityWeights, Summary, SummaryOptions,
    ValidationContext, ValidationResult,
};
pub use tabcontract_parser::{ContractFormat, ParserError};
pub use tabcontract_validator::{Column, DataSet, DataValue, RecordBatchSource, TabularSource};

use tracing::warn;

/// Infers a contract that describes `dataset` exactly.
pub fn infer_contract<S: TabularSource + ?Sized>(dataset: &S) -> Result<Contract> {
    Ok(tabcontract_validator::infer(dataset)?)
}

/// Infers a contract with the given name.
pub fn infer_contract_named<S: TabularSource + ?Sized>(
    dataset: &S,
    name: impl Into<String>,
) -> Result<Contract> {
    Ok(tabcontract_validator::infer_named(dataset, name)?)
}

/// Validates `dataset` against `contract`.
///
/// With `strict`, dataset columns the contract does not declare are issues.
/// Data problems come back as issues in an `Ok` result.
pub fn validate_contract<S: TabularSource + ?Sized>(
    dataset: &S,
    contract: &Contract,
    strict: bool,
) -> Result<ValidationResult> {
    Ok(tabcontract_validator::validate(dataset, contract, strict)?)
}

/// Compares baseline contract `a` with newer contract `b`.
pub fn compare_contracts(a: &Contract, b: &Contract) -> Result<DriftReport> {
    Ok(tabcontract_validator::compare(a, b)?)
}

/// Ranks a validation result's issues by severity.
pub fn summarize_violations(
    result: &ValidationResult,
    options: &SummaryOptions,
) -> Result<Summary> {
    Ok(tabcontract_validator::summarize(result, options)?)
}

/// Validates and turns any issue into an error, for use as a CI gate.
///
/// # Errors
///
/// Returns [`SdkError::ContractViolation`] carrying the full result when
/// validation reports at least one issue.
///
/// # Example
///
/// ```rust
/// use tabcontract_sdk::{validate_and_fail, Column, ContractBuilder, ColumnRule, DataSet, DType};
///
/// let contract = ContractBuilder::new("ids")
///     .column("id", ColumnRule::numeric(DType::Integer, 0.0, None, None))
///     .build()
///     .unwrap();
/// let dataset = DataSet::new(vec![Column::int("id", [Some(1), None])]).unwrap();
///
/// let err = validate_and_fail(&dataset, &contract, true).unwrap_err();
/// assert_eq!(err.violation().map(|r| r.issues().len()), Some(1));
/// ```
pub fn validate_and_fail<S: TabularSource + ?Sized>(
    dataset: &S,
    contract: &Contract,
    strict: bool,
) -> Result<ValidationResult> {
    let result = validate_contract(dataset, contract, strict)?;
    if result.ok() {
        return Ok(result);
    }

    warn!(
        "Contract '{}' violated with {} issues",
        contract.name(),
        result.issues().len()
    );
    Err(SdkError::ContractViolation(Box::new(result)))
}
