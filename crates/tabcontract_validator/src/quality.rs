//! Quality check validation logic.
//!
//! Completeness is the only quality dimension a contract carries: each
//! column tolerates a fraction of missing entries.

use crate::TabularSource;
use tabcontract_core::{ColumnRule, Issue, Result};
use tracing::debug;

/// Validates missingness ceilings on a dataset.
pub struct QualityValidator;

impl QualityValidator {
    /// Creates a new quality validator.
    pub fn new() -> Self {
        Self
    }

    /// Fraction of null (or NaN) entries in a column; 0 for an empty dataset.
    pub fn missing_fraction<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        dataset: &S,
    ) -> Result<f64> {
        let rows = dataset.row_count();
        if rows == 0 {
            return Ok(0.0);
        }
        Ok(dataset.null_count(column)? as f64 / rows as f64)
    }

    /// Reports a `missingness` issue when the observed fraction is strictly
    /// above the rule's ceiling.
    pub fn check_missingness<S: TabularSource + ?Sized>(
        &self,
        column: &str,
        rule: &ColumnRule,
        dataset: &S,
    ) -> Result<Option<Issue>> {
        let observed = self.missing_fraction(column, dataset)?;
        let threshold = rule.max_missing_frac();
        debug!(
            "Column '{}' missing fraction {:.4} (limit {:.4})",
            column, observed, threshold
        );

        if observed > threshold {
            Ok(Some(Issue::missingness(column, threshold, observed)))
        } else {
            Ok(None)
        }
    }
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new()
    }
}
