//! Constraint validation logic.
//!
//! Numeric columns are checked against their bounds, every other column
//! against its allowed values. Both checks assume the column's dtype already
//! matches the rule.

use crate::TabularSource;
use std::collections::BTreeSet;
use tabcontract_core::{ColumnRule, Evidence, Issue, IssueKind, Result};
use tracing::debug;

/// Validates value constraints on a dataset.
pub struct ConstraintValidator;

impl ConstraintValidator {
    /// Creates a new constraint validator.
    pub fn new() -> Self {
        Self
    }

    /// Runs the constraint that applies to the rule's dtype class.
    pub fn validate<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        rule: &ColumnRule,
        dataset: &S,
    ) -> Result<Option<Issue>> {
        if rule.dtype().is_numeric() {
            self.check_range(column, rule, dataset)
        } else {
            self.check_category(column, rule, dataset)
        }
    }

    /// Reports one `range` issue naming every exceeded bound and the margin
    /// by which it was exceeded. Unset bounds are unconstrained.
    pub fn check_range<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        rule: &ColumnRule,
        dataset: &S,
    ) -> Result<Option<Issue>> {
        let (min_value, max_value) = rule.bounds();
        if min_value.is_none() && max_value.is_none() {
            return Ok(None);
        }

        let Some((data_min, data_max)) = dataset.numeric_bounds(column)? else {
            return Ok(None);
        };

        let mut violations = Vec::new();
        if let Some(min) = min_value.filter(|min| data_min < *min) {
            violations.push(format!(
                "min {} is below min_value {} by {}",
                data_min,
                min,
                min - data_min
            ));
        }
        if let Some(max) = max_value.filter(|max| data_max > *max) {
            violations.push(format!(
                "max {} exceeds max_value {} by {}",
                data_max,
                max,
                data_max - max
            ));
        }

        if violations.is_empty() {
            return Ok(None);
        }

        debug!("Column '{}' out of range: {}", column, violations.join("; "));
        Ok(Some(Issue::new(
            IssueKind::Range,
            Some(column.to_string()),
            format!(
                "Column '{}' has values outside the expected range: {}",
                column,
                violations.join("; ")
            ),
            Evidence::Bounds {
                min: min_value,
                max: max_value,
            },
            Evidence::Bounds {
                min: Some(data_min),
                max: Some(data_max),
            },
        )))
    }

    /// Reports one `category` issue listing every distinct value outside the
    /// allowed set. A rule without allowed values is unconstrained.
    pub fn check_category<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        rule: &ColumnRule,
        dataset: &S,
    ) -> Result<Option<Issue>> {
        let Some(allowed) = rule.allowed_values() else {
            return Ok(None);
        };

        let unexpected: BTreeSet<String> = dataset
            .distinct_values(column)?
            .into_iter()
            .filter(|value| !allowed.contains(value))
            .collect();

        if unexpected.is_empty() {
            return Ok(None);
        }

        let shown = Evidence::Values(unexpected);
        debug!("Column '{}' has unexpected values {}", column, shown);
        Ok(Some(Issue::new(
            IssueKind::Category,
            Some(column.to_string()),
            format!("Column '{column}' has values outside the allowed set: {shown}"),
            Evidence::Values(allowed.clone()),
            shown,
        )))
    }
}

impl Default for ConstraintValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, DataSet};
    use pretty_assertions::assert_eq;
    use tabcontract_core::DType;

    fn values(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_range_within_bounds() {
        let validator = ConstraintValidator::new();
        let dataset = DataSet::new(vec![Column::int("age", [Some(25), Some(30)])]).unwrap();
        let rule = ColumnRule::numeric(DType::Integer, 0.0, Some(20.0), Some(60.0));
        assert_eq!(validator.check_range("age", &rule, &dataset).unwrap(), None);
    }

    #[test]
    fn test_range_merges_both_sides() {
        let validator = ConstraintValidator::new();
        let dataset = DataSet::new(vec![Column::int("age", [Some(5), Some(150), None])]).unwrap();
        let rule = ColumnRule::numeric(DType::Integer, 0.5, Some(20.0), Some(60.0));

        let issue = validator.check_range("age", &rule, &dataset).unwrap().unwrap();
        assert_eq!(issue.kind(), IssueKind::Range);
        assert!(issue.message().contains("below min_value 20 by 15"));
        assert!(issue.message().contains("exceeds max_value 60 by 90"));
        assert_eq!(
            issue.observed(),
            &Evidence::Bounds {
                min: Some(5.0),
                max: Some(150.0)
            }
        );
    }

    #[test]
    fn test_range_open_bound() {
        let validator = ConstraintValidator::new();
        let dataset = DataSet::new(vec![Column::float("x", [Some(-1e9), Some(1e9)])]).unwrap();
        let rule = ColumnRule::numeric(DType::Float, 0.0, None, Some(1e9));
        assert_eq!(validator.check_range("x", &rule, &dataset).unwrap(), None);
    }

    #[test]
    fn test_range_all_null_column() {
        let validator = ConstraintValidator::new();
        let dataset = DataSet::new(vec![Column::float("x", [None])]).unwrap();
        let rule = ColumnRule::numeric(DType::Float, 1.0, Some(0.0), Some(1.0));
        assert_eq!(validator.check_range("x", &rule, &dataset).unwrap(), None);
    }

    #[test]
    fn test_category_lists_every_offender() {
        let validator = ConstraintValidator::new();
        let dataset = DataSet::new(vec![Column::string(
            "city",
            ["NYC", "Paris", "Rome", "Paris"].map(Some),
        )])
        .unwrap();
        let rule = ColumnRule::categorical(DType::String, 0.0, Some(values(&["NYC", "SF", "LA"])));

        let issue = validator.validate("city", &rule, &dataset).unwrap().unwrap();
        assert_eq!(issue.kind(), IssueKind::Category);
        assert_eq!(issue.observed(), &Evidence::Values(values(&["Paris", "Rome"])));
        assert!(issue.message().contains("'Paris'"));
    }

    #[test]
    fn test_category_without_domain() {
        let validator = ConstraintValidator::new();
        let dataset = DataSet::new(vec![Column::string("city", [Some("Paris")])]).unwrap();
        let rule = ColumnRule::categorical(DType::String, 0.0, None);
        assert_eq!(validator.check_category("city", &rule, &dataset).unwrap(), None);

        let rule = ColumnRule::categorical(DType::String, 0.0, Some(BTreeSet::new()));
        assert!(validator.check_category("city", &rule, &dataset).unwrap().is_some());
    }
}
