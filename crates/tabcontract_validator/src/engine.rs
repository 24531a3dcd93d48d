//! Main validation engine.
//!
//! This module provides the main `DataValidator` that orchestrates the
//! schema, quality and constraint checks.

use crate::{ConstraintValidator, QualityValidator, SchemaValidator, TabularSource};
use tabcontract_core::{ColumnRule, Contract, Issue, Result, ValidationContext, ValidationResult};
use tracing::{debug, info};

/// Main validation engine for data contracts.
///
/// Orchestrates all validation checks and produces a [`ValidationResult`]
/// whose issues follow a fixed order: missing columns, extra columns, then
/// per contract column its dtype, missingness and range or category issues.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{ColumnRule, ContractBuilder, DType, ValidationContext};
/// use tabcontract_validator::{Column, DataSet, DataValidator};
///
/// let contract = ContractBuilder::new("people")
///     .column("age", ColumnRule::numeric(DType::Integer, 0.0, Some(20.0), Some(60.0)))
///     .build()
///     .unwrap();
/// let dataset = DataSet::new(vec![Column::int("age", [Some(25), Some(150), Some(30)])]).unwrap();
///
/// let validator = DataValidator::new();
/// let result = validator
///     .validate_with_data(&dataset, &contract, &ValidationContext::new())
///     .unwrap();
///
/// assert!(!result.ok());
/// for issue in result.issues() {
///     println!("{}", issue);
/// }
/// ```
pub struct DataValidator {
    schema_validator: SchemaValidator,
    quality_validator: QualityValidator,
    constraint_validator: ConstraintValidator,
}

impl DataValidator {
    /// Creates a new data validator.
    pub fn new() -> Self {
        Self {
            schema_validator: SchemaValidator::new(),
            quality_validator: QualityValidator::new(),
            constraint_validator: ConstraintValidator::new(),
        }
    }

    /// Validates a dataset against a contract.
    ///
    /// Data that departs from the contract is reported as issues, never as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns any [`Contract::check`] failure, before the dataset is read.
    pub fn validate_with_data<S: TabularSource + ?Sized>(
        &self,
        dataset: &S,
        contract: &Contract,
        context: &ValidationContext,
    ) -> Result<ValidationResult> {
        contract.check()?;

        // 1-2. Missing and extra columns
        let mut issues = self
            .schema_validator
            .validate_columns(contract, dataset, context);

        // 3. Per-column checks, in contract order
        for (column, rule) in contract.iter() {
            if !dataset.has_column(column) {
                continue;
            }
            issues.extend(self.validate_column(column, rule, dataset)?);
        }

        let result = ValidationResult::from_issues(issues);
        info!(
            "Validated {} rows against contract '{}': {} issues",
            dataset.row_count(),
            contract.name(),
            result.issues().len()
        );
        Ok(result)
    }

    /// Runs the dtype, missingness and value checks for one present column.
    ///
    /// A dtype mismatch suppresses the value check; missingness always runs.
    fn validate_column<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        rule: &ColumnRule,
        dataset: &S,
    ) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();

        let dtype_issue = self.schema_validator.check_dtype(column, rule, dataset)?;
        let dtype_matches = dtype_issue.is_none();
        issues.extend(dtype_issue);

        issues.extend(
            self.quality_validator
                .check_missingness(column, rule, dataset)?,
        );

        if dtype_matches {
            issues.extend(self.constraint_validator.validate(column, rule, dataset)?);
        } else {
            debug!("Skipping value checks for column '{}'", column);
        }

        Ok(issues)
    }
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates `dataset` against `contract`.
///
/// With `strict`, dataset columns absent from the contract are reported as
/// `extra_column` issues. See [`DataValidator::validate_with_data`].
pub fn validate<S: TabularSource + ?Sized>(
    dataset: &S,
    contract: &Contract,
    strict: bool,
) -> Result<ValidationResult> {
    let context = ValidationContext::new().with_strict(strict);
    DataValidator::new().validate_with_data(dataset, contract, &context)
}
