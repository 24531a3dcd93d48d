//! Schema validation logic.
//!
//! This module checks the shape of a dataset against a contract: which
//! columns are present, which are unexpected, and whether each column's
//! declared type normalizes to the contracted dtype.

use crate::TabularSource;
use tabcontract_core::{ColumnRule, Contract, ContractError, DType, Issue, Result, ValidationContext};
use tracing::debug;

/// Validates the schema of a dataset against a contract.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    pub fn new() -> Self {
        Self
    }

    /// Reports contract columns absent from the dataset, then, in strict
    /// mode, dataset columns the contract does not declare.
    ///
    /// Missing columns come in contract order, extra columns in dataset order.
    pub fn validate_columns<S: TabularSource + ?Sized>(
        &self,
        contract: &Contract,
        dataset: &S,
        context: &ValidationContext,
    ) -> Vec<Issue> {
        let mut issues: Vec<Issue> = contract
            .column_names()
            .into_iter()
            .filter(|column| !dataset.has_column(column))
            .map(Issue::missing_column)
            .collect();

        if context.strict {
            issues.extend(
                dataset
                    .column_names()
                    .into_iter()
                    .filter(|column| !contract.contains(column))
                    .map(Issue::extra_column),
            );
        }

        debug!("Schema column check found {} issues", issues.len());
        issues
    }

    /// Normalized dtype of a dataset column.
    ///
    /// # Errors
    ///
    /// - [`ContractError::UnknownColumn`] if the dataset lacks the column
    /// - [`ContractError::UnsupportedType`] if its declared type is not
    ///   recognized
    pub fn observed_dtype<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        dataset: &S,
    ) -> Result<DType> {
        let declared = self.declared_type(column, dataset)?;
        DType::from_declared(&declared).ok_or_else(|| ContractError::unsupported_type(column, declared))
    }

    /// Compares a present column's dtype with its rule.
    ///
    /// Returns a `dtype` issue on mismatch, `None` when the types agree. A
    /// declared type outside the known dtypes never matches and is reported
    /// with its raw tag.
    pub fn check_dtype<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        rule: &ColumnRule,
        dataset: &S,
    ) -> Result<Option<Issue>> {
        let declared = self.declared_type(column, dataset)?;
        let Some(observed) = DType::from_declared(&declared) else {
            debug!(
                "Column '{}' has unrecognized type '{}', contract expects {}",
                column,
                declared,
                rule.dtype()
            );
            return Ok(Some(Issue::unrecognized_dtype(column, rule.dtype(), declared)));
        };
        if observed == rule.dtype() {
            return Ok(None);
        }
        debug!(
            "Column '{}' declared as {} but contract expects {}",
            column,
            observed,
            rule.dtype()
        );
        Ok(Some(Issue::dtype(column, rule.dtype(), observed)))
    }

    fn declared_type<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        dataset: &S,
    ) -> Result<String> {
        dataset
            .declared_type(column)
            .ok_or_else(|| ContractError::UnknownColumn(column.to_string()))
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}
