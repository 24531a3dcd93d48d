//! Drift detection between two contracts.
//!
//! Compares a baseline contract against a newer one and reports which
//! columns appeared, disappeared, or changed their expectations.

use tabcontract_core::{Contract, DriftReport, Result};
use tracing::{debug, info, warn};

/// Compares baseline contract `a` against newer contract `b`.
///
/// For columns present in both:
///
/// - a dtype change is recorded on its own; bounds and domains are not
///   compared across dtypes
/// - numeric columns record a range change when either bound differs
/// - other columns record a category change when the allowed values differ,
///   where "no domain" and "empty domain" are different
/// - a changed missingness ceiling is recorded regardless of dtype
///
/// # Errors
///
/// Both contracts are checked with [`Contract::check`] before anything is
/// compared; the first malformed rule is returned.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{ColumnRule, ContractBuilder, DType};
/// use tabcontract_validator::compare;
///
/// let a = ContractBuilder::new("v1")
///     .column("age", ColumnRule::numeric(DType::Integer, 0.05, Some(18.0), Some(65.0)))
///     .build()
///     .unwrap();
/// let b = ContractBuilder::new("v2")
///     .column("age", ColumnRule::numeric(DType::Integer, 0.2, Some(18.0), Some(65.0)))
///     .column("email", ColumnRule::categorical(DType::String, 0.0, None))
///     .build()
///     .unwrap();
///
/// let report = compare(&a, &b).unwrap();
/// assert!(report.has_drift());
/// assert!(report.added_columns.contains("email"));
/// assert_eq!(report.missingness_changes["age"], (0.05, 0.2));
/// ```
pub fn compare(a: &Contract, b: &Contract) -> Result<DriftReport> {
    for contract in [a, b] {
        contract.check().inspect_err(|err| {
            warn!("Contract '{}' is malformed: {}", contract.name(), err);
        })?;
    }

    let mut report = DriftReport {
        added_columns: b
            .column_names()
            .into_iter()
            .filter(|column| !a.contains(column))
            .map(String::from)
            .collect(),
        removed_columns: a
            .column_names()
            .into_iter()
            .filter(|column| !b.contains(column))
            .map(String::from)
            .collect(),
        ..DriftReport::default()
    };

    for (column, old) in a.iter() {
        let Some(new) = b.get(column) else {
            continue;
        };

        if old.dtype() != new.dtype() {
            debug!("Column '{}' dtype {} -> {}", column, old.dtype(), new.dtype());
            report
                .dtype_changes
                .insert(column.to_string(), (old.dtype(), new.dtype()));
        } else if old.dtype().is_numeric() {
            if old.bounds() != new.bounds() {
                report.range_changes.insert(column.to_string());
            }
        } else if old.allowed_values() != new.allowed_values() {
            report.category_changes.insert(column.to_string());
        }

        if old.max_missing_frac() != new.max_missing_frac() {
            report.missingness_changes.insert(
                column.to_string(),
                (old.max_missing_frac(), new.max_missing_frac()),
            );
        }
    }

    info!(
        "Compared contracts '{}' and '{}': drift = {}",
        a.name(),
        b.name(),
        report.has_drift()
    );
    Ok(report)
}
