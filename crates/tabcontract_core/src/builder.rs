//! Builder pattern for creating data contracts.
//!
//! This module provides ergonomic builders for constructing contracts
//! and their column rules with a fluent API.

use crate::{ColumnRule, Contract, DType, Result};
use std::collections::BTreeSet;

/// Builder for creating a `Contract`.
///
/// `build` rejects duplicate column names. Rule well-formedness is left to
/// [`ColumnRuleBuilder`] and to the consumers of the contract, which check it
/// eagerly.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{ColumnRuleBuilder, ContractBuilder, DType};
///
/// let contract = ContractBuilder::new("orders")
///     .rule(ColumnRuleBuilder::new("amount", DType::Float).bounds(0.0, 1e6))
///     .rule(ColumnRuleBuilder::new("status", DType::Categorical).allowed_values(["open", "closed"]))
///     .build()
///     .unwrap();
///
/// assert_eq!(contract.len(), 2);
/// ```
#[derive(Debug)]
pub struct ContractBuilder {
    name: String,
    columns: Vec<(String, Result<ColumnRule>)>,
}

impl ContractBuilder {
    /// Creates a new contract builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds an already constructed rule.
    pub fn column(mut self, name: impl Into<String>, rule: ColumnRule) -> Self {
        self.columns.push((name.into(), Ok(rule)));
        self
    }

    /// Adds multiple `(name, rule)` pairs.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnRule)>,
        S: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(|(name, rule)| (name.into(), Ok(rule))));
        self
    }

    /// Adds a rule from a rule builder; its checks run at `build` time.
    pub fn rule(mut self, rule: ColumnRuleBuilder) -> Self {
        let name = rule.column.clone();
        self.columns.push((name, rule.build()));
        self
    }

    /// Builds the contract.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a [`ColumnRuleBuilder`], or
    /// [`ContractError::DuplicateColumn`](crate::ContractError::DuplicateColumn)
    /// if a column name repeats.
    pub fn build(self) -> Result<Contract> {
        let mut contract = Contract::new(self.name);
        for (name, rule) in self.columns {
            contract.insert(name, rule?)?;
        }
        Ok(contract)
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CONTRACT_NAME)
    }
}

/// Builder for creating a checked `ColumnRule`.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{ColumnRuleBuilder, DType};
///
/// let rule = ColumnRuleBuilder::new("age", DType::Integer)
///     .max_missing_frac(0.05)
///     .bounds(0.0, 120.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(rule.max_value(), Some(120.0));
/// ```
#[derive(Debug, Clone)]
pub struct ColumnRuleBuilder {
    column: String,
    dtype: DType,
    max_missing_frac: f64,
    min_value: Option<f64>,
    max_value: Option<f64>,
    allowed_values: Option<BTreeSet<String>>,
}

impl ColumnRuleBuilder {
    /// Creates a new rule builder for the given column.
    pub fn new(column: impl Into<String>, dtype: DType) -> Self {
        Self {
            column: column.into(),
            dtype,
            max_missing_frac: 0.0,
            min_value: None,
            max_value: None,
            allowed_values: None,
        }
    }

    /// Sets the tolerated missing fraction.
    pub fn max_missing_frac(mut self, frac: f64) -> Self {
        self.max_missing_frac = frac;
        self
    }

    /// Sets the lower bound.
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Sets the upper bound.
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Sets both bounds.
    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min_value(min).max_value(max)
    }

    /// Sets the allowed values.
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one allowed value.
    pub fn allowed_value(mut self, value: impl Into<String>) -> Self {
        self.allowed_values
            .get_or_insert_with(BTreeSet::new)
            .insert(value.into());
        self
    }

    /// Builds the rule, running [`ColumnRule::check`].
    pub fn build(self) -> Result<ColumnRule> {
        let rule = ColumnRule::from_parts(
            self.dtype,
            self.max_missing_frac,
            self.min_value,
            self.max_value,
            self.allowed_values,
        );
        rule.check(&self.column)?;
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContractError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_builder_defaults() {
        let rule = ColumnRuleBuilder::new("name", DType::String).build().unwrap();
        assert_eq!(rule.max_missing_frac(), 0.0);
        assert_eq!(rule.allowed_values(), None);
        assert_eq!(rule.bounds(), (None, None));
    }

    #[test]
    fn test_rule_builder_collects_values() {
        let rule = ColumnRuleBuilder::new("flag", DType::Boolean)
            .allowed_value("true")
            .allowed_value("false")
            .allowed_value("true")
            .build()
            .unwrap();
        assert_eq!(rule.allowed_values().map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_rule_builder_rejects_bounds_on_strings() {
        let err = ColumnRuleBuilder::new("city", DType::String)
            .min_value(1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ContractError::MalformedRule { ref column, .. } if column == "city"));
    }

    #[test]
    fn test_rule_builder_rejects_inverted_bounds() {
        let err = ColumnRuleBuilder::new("age", DType::Integer)
            .bounds(5.0, 1.0)
            .build()
            .unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn test_contract_builder_propagates_rule_errors() {
        let result = ContractBuilder::new("bad")
            .rule(ColumnRuleBuilder::new("age", DType::Integer).max_missing_frac(-0.1))
            .build();
        assert!(matches!(
            result,
            Err(ContractError::InvalidMissingFraction { .. })
        ));
    }

    #[test]
    fn test_contract_builder_rejects_duplicates() {
        let rule = ColumnRule::categorical(DType::String, 0.0, None);
        let result = ContractBuilder::default()
            .column("a", rule.clone())
            .column("a", rule)
            .build();
        assert_eq!(result.unwrap_err(), ContractError::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_contract_builder_keeps_unchecked_rules() {
        // Raw rules are stored as-is so consumers can report them.
        let contract = ContractBuilder::default()
            .column("x", ColumnRule::numeric(DType::Float, 3.0, None, None))
            .build()
            .unwrap();
        assert!(contract.check().is_err());
    }
}
