//! Drift and summary report types, and the severity configuration used to
//! rank issues.

use crate::{ContractError, DType, Issue, IssueKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Differences between a baseline contract (`a`) and a newer one (`b`).
///
/// "Added" means present in `b` only, "removed" means present in `a` only;
/// pairs are reported as `(old, new)` = `(a, b)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftReport {
    /// Columns only in the newer contract
    pub added_columns: BTreeSet<String>,

    /// Columns only in the baseline contract
    pub removed_columns: BTreeSet<String>,

    /// Shared columns whose dtype changed
    pub dtype_changes: BTreeMap<String, (DType, DType)>,

    /// Shared numeric columns whose bounds changed
    pub range_changes: BTreeSet<String>,

    /// Shared non-numeric columns whose allowed values changed
    pub category_changes: BTreeSet<String>,

    /// Shared columns whose missingness threshold changed
    pub missingness_changes: BTreeMap<String, (f64, f64)>,
}

impl DriftReport {
    /// Returns true if any kind of drift was detected.
    pub fn has_drift(&self) -> bool {
        !(self.added_columns.is_empty()
            && self.removed_columns.is_empty()
            && self.dtype_changes.is_empty()
            && self.range_changes.is_empty()
            && self.category_changes.is_empty()
            && self.missingness_changes.is_empty())
    }
}

/// Severity weight per issue kind.
///
/// A supplied table replaces the defaults entirely; kinds it does not list
/// weigh 1.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{IssueKind, SeverityWeights};
///
/// let defaults = SeverityWeights::default();
/// assert_eq!(defaults.weight(IssueKind::MissingColumn), 10.0);
///
/// let custom = SeverityWeights::from_pairs([(IssueKind::Range, 100.0)]);
/// assert_eq!(custom.weight(IssueKind::Range), 100.0);
/// assert_eq!(custom.weight(IssueKind::DType), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct SeverityWeights {
    weights: BTreeMap<IssueKind, f64>,
}

/// Weight given to kinds absent from a weight table.
pub const FALLBACK_WEIGHT: f64 = 1.0;

impl SeverityWeights {
    /// Builds a table from `(kind, weight)` pairs. Weights are checked when
    /// the table is used.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (IssueKind, f64)>,
    {
        Self {
            weights: pairs.into_iter().collect(),
        }
    }

    /// The default table: schema problems outrank distribution problems.
    pub fn default_table() -> Self {
        Self::from_pairs([
            (IssueKind::MissingColumn, 10.0),
            (IssueKind::ExtraColumn, 8.0),
            (IssueKind::DType, 7.0),
            (IssueKind::Range, 5.0),
            (IssueKind::Category, 5.0),
            (IssueKind::Missingness, 3.0),
        ])
    }

    /// Weight for a kind, falling back to [`FALLBACK_WEIGHT`].
    pub fn weight(&self, kind: IssueKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(FALLBACK_WEIGHT)
    }

    /// Explicitly listed `(kind, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (IssueKind, f64)> + '_ {
        self.weights.iter().map(|(kind, weight)| (*kind, *weight))
    }

    /// Checks that every weight is a positive number. `+inf` is allowed;
    /// zero, negatives and NaN are not.
    pub fn check(&self) -> Result<()> {
        for (kind, weight) in self.iter() {
            if weight.is_nan() || weight <= 0.0 {
                return Err(ContractError::InvalidWeight {
                    kind: kind.to_string(),
                    weight,
                });
            }
        }
        Ok(())
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self::default_table()
    }
}

impl TryFrom<BTreeMap<String, f64>> for SeverityWeights {
    type Error = String;

    fn try_from(raw: BTreeMap<String, f64>) -> std::result::Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(kind, weight)| Ok((kind.parse::<IssueKind>()?, weight)))
            .collect::<std::result::Result<BTreeMap<_, _>, String>>()
            .map(|weights| Self { weights })
    }
}

impl From<SeverityWeights> for BTreeMap<String, f64> {
    fn from(table: SeverityWeights) -> Self {
        table
            .weights
            .into_iter()
            .map(|(kind, weight)| (kind.to_string(), weight))
            .collect()
    }
}

/// Default number of issues kept in a summary.
pub const DEFAULT_TOP_K: usize = 5;

/// Options for summarizing a validation result.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{IssueKind, SeverityWeights, SummaryOptions};
///
/// let options = SummaryOptions::new()
///     .with_top_k(3)
///     .with_weights(SeverityWeights::from_pairs([(IssueKind::Range, 20.0)]));
/// assert_eq!(options.top_k, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Maximum number of issues to keep
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Replacement weight table; `None` uses the defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<SeverityWeights>,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl SummaryOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of top issues.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Replaces the weight table.
    pub fn with_weights(mut self, weights: SeverityWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Checks `top_k` and every supplied weight.
    pub fn check(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(ContractError::InvalidTopK(self.top_k));
        }
        if let Some(weights) = &self.weights {
            weights.check()?;
        }
        Ok(())
    }

    /// The table actually used for ranking.
    pub fn effective_weights(&self) -> SeverityWeights {
        self.weights.clone().unwrap_or_default()
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            weights: None,
        }
    }
}

/// Prioritized view of a validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Copied from the validation result
    pub ok: bool,

    /// Highest-severity issues, at most `top_k`
    pub top_issues: Vec<Issue>,

    /// Count of every issue by kind
    pub counts_by_kind: BTreeMap<IssueKind, usize>,
}

impl Summary {
    /// Total number of issues counted.
    pub fn total_issues(&self) -> usize {
        self.counts_by_kind.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_report_has_no_drift() {
        assert!(!DriftReport::default().has_drift());
    }

    #[test]
    fn test_any_collection_marks_drift() {
        let mut report = DriftReport::default();
        report
            .missingness_changes
            .insert("age".into(), (0.05, 0.2));
        assert!(report.has_drift());

        let mut report = DriftReport::default();
        report.category_changes.insert("city".into());
        assert!(report.has_drift());
    }

    #[test]
    fn test_default_weights() {
        let weights = SeverityWeights::default();
        assert_eq!(weights.weight(IssueKind::ExtraColumn), 8.0);
        assert_eq!(weights.weight(IssueKind::DType), 7.0);
        assert_eq!(weights.weight(IssueKind::Range), 5.0);
        assert_eq!(weights.weight(IssueKind::Category), 5.0);
        assert_eq!(weights.weight(IssueKind::Missingness), 3.0);
    }

    #[test]
    fn test_weights_check() {
        let weights = SeverityWeights::from_pairs([(IssueKind::DType, 0.0)]);
        assert!(matches!(
            weights.check(),
            Err(ContractError::InvalidWeight { .. })
        ));
        let weights = SeverityWeights::from_pairs([(IssueKind::DType, 10.0), (IssueKind::Range, -5.0)]);
        assert!(weights.check().is_err());
        let weights = SeverityWeights::from_pairs([(IssueKind::Range, f64::NAN)]);
        assert!(weights.check().is_err());
        assert!(SeverityWeights::default().check().is_ok());
    }

    #[test]
    fn test_infinite_weight_is_allowed() {
        let weights = SeverityWeights::from_pairs([(IssueKind::Missingness, f64::INFINITY)]);
        assert!(weights.check().is_ok());
        assert_eq!(weights.weight(IssueKind::Missingness), f64::INFINITY);
    }

    #[test]
    fn test_weights_serde_uses_kind_tags() {
        let weights: SeverityWeights = serde_json::from_str(r#"{"range": 100}"#).unwrap();
        assert_eq!(weights.weight(IssueKind::Range), 100.0);
        assert_eq!(weights.weight(IssueKind::MissingColumn), 1.0);

        let result: std::result::Result<SeverityWeights, _> =
            serde_json::from_str(r#"{"custom_kind": 2}"#);
        assert!(result.is_err());

        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"range":100.0}"#);
    }

    #[test]
    fn test_summary_options_check() {
        assert!(SummaryOptions::default().check().is_ok());
        assert_eq!(
            SummaryOptions::new().with_top_k(0).check(),
            Err(ContractError::InvalidTopK(0))
        );
    }

    #[test]
    fn test_drift_report_serde() {
        let mut report = DriftReport::default();
        report
            .dtype_changes
            .insert("age".into(), (DType::Integer, DType::Float));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dtype_changes"]["age"], serde_json::json!(["integer", "float"]));

        let parsed: DriftReport = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_summary_serde() {
        let summary = Summary {
            ok: false,
            top_issues: vec![Issue::missing_column("id")],
            counts_by_kind: BTreeMap::from([
                (IssueKind::MissingColumn, 1),
                (IssueKind::Missingness, 2),
            ]),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json["counts_by_kind"],
            serde_json::json!({"missing_column": 1, "missingness": 2})
        );
        assert_eq!(json["top_issues"][0]["kind"], "missing_column");

        let parsed: Summary = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, summary);
        assert_eq!(parsed.total_issues(), 3);
    }
}
