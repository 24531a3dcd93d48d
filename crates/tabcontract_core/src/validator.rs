//! Validation context and result types.
//!
//! A validation run produces a [`ValidationResult`]: an ordered list of
//! [`Issue`]s, each describing one way a dataset departs from its contract.

use crate::DType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Context for validation operations.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::ValidationContext;
///
/// let context = ValidationContext::new();
/// assert!(context.strict);
///
/// let lenient = ValidationContext::new().with_strict(false);
/// assert!(!lenient.strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Whether dataset columns missing from the contract are reported
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl ValidationContext {
    /// Creates a new validation context with default settings (strict).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets strict validation mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            strict: default_strict(),
        }
    }
}

/// Kind of a validation issue.
///
/// Kinds order alphabetically by their tag, which is the final tie-break when
/// ranking issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// Contract column absent from the dataset
    #[serde(rename = "missing_column")]
    MissingColumn,
    /// Dataset column absent from the contract (strict mode only)
    #[serde(rename = "extra_column")]
    ExtraColumn,
    /// Column type differs from the contract
    #[serde(rename = "dtype")]
    DType,
    /// Too many null entries
    #[serde(rename = "missingness")]
    Missingness,
    /// Values outside the numeric bounds
    #[serde(rename = "range")]
    Range,
    /// Values outside the categorical domain
    #[serde(rename = "category")]
    Category,
}

impl IssueKind {
    /// Every issue kind, in detection order.
    pub const ALL: [IssueKind; 6] = [
        IssueKind::MissingColumn,
        IssueKind::ExtraColumn,
        IssueKind::DType,
        IssueKind::Missingness,
        IssueKind::Range,
        IssueKind::Category,
    ];

    /// Tag used in serialized output and weight tables.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::MissingColumn => "missing_column",
            IssueKind::ExtraColumn => "extra_column",
            IssueKind::DType => "dtype",
            IssueKind::Missingness => "missingness",
            IssueKind::Range => "range",
            IssueKind::Category => "category",
        }
    }
}

impl PartialOrd for IssueKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IssueKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown issue kind '{s}'"))
    }
}

/// Expected or observed payload attached to an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// The column exists
    Present,
    /// The column does not exist
    Absent,
    /// A column type
    #[serde(rename = "dtype")]
    DType(DType),
    /// A raw type tag outside the known dtypes
    DeclaredType(String),
    /// A missing-value fraction
    Fraction(f64),
    /// Numeric bounds; `None` means unbounded on that side
    Bounds {
        /// Lower bound
        #[serde(default, with = "crate::bound")]
        min: Option<f64>,
        /// Upper bound
        #[serde(default, with = "crate::bound")]
        max: Option<f64>,
    },
    /// A set of stringified values
    Values(BTreeSet<String>),
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Present => f.write_str("present"),
            Evidence::Absent => f.write_str("absent"),
            Evidence::DType(dtype) => write!(f, "{dtype}"),
            Evidence::DeclaredType(tag) => write!(f, "{tag}"),
            Evidence::Fraction(frac) => write!(f, "{frac:.4}"),
            Evidence::Bounds { min, max } => {
                let show = |v: &Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
                write!(f, "[{}, {}]", show(min), show(max))
            }
            Evidence::Values(values) => {
                let joined = values
                    .iter()
                    .map(|v| format!("'{v}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{joined}}}")
            }
        }
    }
}

/// A single detected violation of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    kind: IssueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<String>,
    message: String,
    expected: Evidence,
    observed: Evidence,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(
        kind: IssueKind,
        column: Option<String>,
        message: impl Into<String>,
        expected: Evidence,
        observed: Evidence,
    ) -> Self {
        Self {
            kind,
            column,
            message: message.into(),
            expected,
            observed,
        }
    }

    /// Contract column missing from the dataset.
    pub fn missing_column(column: impl Into<String>) -> Self {
        let column = column.into();
        Self::new(
            IssueKind::MissingColumn,
            Some(column.clone()),
            format!("Column '{column}' is required by the contract but missing from the dataset"),
            Evidence::Present,
            Evidence::Absent,
        )
    }

    /// Dataset column not declared in the contract.
    pub fn extra_column(column: impl Into<String>) -> Self {
        let column = column.into();
        Self::new(
            IssueKind::ExtraColumn,
            Some(column.clone()),
            format!("Column '{column}' is present in the dataset but not declared in the contract"),
            Evidence::Absent,
            Evidence::Present,
        )
    }

    /// Column type mismatch.
    pub fn dtype(column: impl Into<String>, expected: DType, observed: DType) -> Self {
        let column = column.into();
        Self::new(
            IssueKind::DType,
            Some(column.clone()),
            format!("Column '{column}' type mismatch: expected {expected}, got {observed}"),
            Evidence::DType(expected),
            Evidence::DType(observed),
        )
    }

    /// Column whose declared type is not one of the known dtypes.
    pub fn unrecognized_dtype(
        column: impl Into<String>,
        expected: DType,
        declared: impl Into<String>,
    ) -> Self {
        let column = column.into();
        let declared = declared.into();
        Self::new(
            IssueKind::DType,
            Some(column.clone()),
            format!("Column '{column}' type mismatch: expected {expected}, got unrecognized type '{declared}'"),
            Evidence::DType(expected),
            Evidence::DeclaredType(declared),
        )
    }

    /// Null fraction above the tolerated threshold.
    pub fn missingness(column: impl Into<String>, threshold: f64, observed: f64) -> Self {
        let column = column.into();
        Self::new(
            IssueKind::Missingness,
            Some(column.clone()),
            format!(
                "Column '{column}' has {:.2}% missing values, above the {:.2}% limit",
                observed * 100.0,
                threshold * 100.0
            ),
            Evidence::Fraction(threshold),
            Evidence::Fraction(observed),
        )
    }

    /// Issue kind.
    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    /// Column the issue refers to; `None` for dataset-level issues.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// What the contract expected.
    pub fn expected(&self) -> &Evidence {
        &self.expected
    }

    /// What the dataset showed.
    pub fn observed(&self) -> &Evidence {
        &self.observed
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of validating a dataset against a contract.
///
/// `ok` is derived from the issue list and cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ValidationResultDef")]
pub struct ValidationResult {
    ok: bool,
    issues: Vec<Issue>,
}

impl ValidationResult {
    /// Creates a result from issues in detection order.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }

    /// A result with no issues.
    pub fn success() -> Self {
        Self::from_issues(Vec::new())
    }

    /// True if no issue was found.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Issues in detection order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the result, returning its issues.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Number of issues of each kind present.
    pub fn counts_by_kind(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind()).or_insert(0) += 1;
        }
        counts
    }
}

#[derive(Deserialize)]
struct ValidationResultDef {
    #[serde(default)]
    issues: Vec<Issue>,
}

impl From<ValidationResultDef> for ValidationResult {
    fn from(def: ValidationResultDef) -> Self {
        Self::from_issues(def.issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_context_defaults_to_strict() {
        assert!(ValidationContext::default().strict);
        let context: ValidationContext = serde_json::from_str("{}").unwrap();
        assert!(context.strict);
    }

    #[test]
    fn test_kind_order_is_alphabetical() {
        let mut kinds = IssueKind::ALL.to_vec();
        kinds.sort();
        let tags: Vec<_> = kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "category",
                "dtype",
                "extra_column",
                "missing_column",
                "missingness",
                "range"
            ]
        );
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in IssueKind::ALL {
            assert_eq!(kind.as_str().parse::<IssueKind>(), Ok(kind));
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.as_str())
            );
        }
        assert!("custom_kind".parse::<IssueKind>().is_err());
    }

    #[test]
    fn test_missing_column_payloads() {
        let issue = Issue::missing_column("age");
        assert_eq!(issue.kind(), IssueKind::MissingColumn);
        assert_eq!(issue.column(), Some("age"));
        assert_eq!(issue.expected(), &Evidence::Present);
        assert_eq!(issue.observed(), &Evidence::Absent);
    }

    #[test]
    fn test_result_ok_tracks_issues() {
        assert!(ValidationResult::success().ok());
        let result = ValidationResult::from_issues(vec![Issue::extra_column("bonus")]);
        assert!(!result.ok());
        assert_eq!(result.issues().len(), 1);
    }

    #[test]
    fn test_result_deserialize_recomputes_ok() {
        let json = serde_json::to_string(&ValidationResult::from_issues(vec![
            Issue::dtype("age", DType::Integer, DType::String),
        ]))
        .unwrap();
        let tampered = json.replace("\"ok\":false", "\"ok\":true");
        let parsed: ValidationResult = serde_json::from_str(&tampered).unwrap();
        assert!(!parsed.ok());
    }

    #[test]
    fn test_evidence_display() {
        assert_eq!(
            Evidence::Bounds {
                min: Some(20.0),
                max: None
            }
            .to_string(),
            "[20, -]"
        );
        let values: BTreeSet<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(Evidence::Values(values).to_string(), "{'a', 'b'}");
    }

    #[test]
    fn test_counts_by_kind() {
        let result = ValidationResult::from_issues(vec![
            Issue::missing_column("a"),
            Issue::missing_column("b"),
            Issue::missingness("c", 0.0, 0.5),
        ]);
        let counts = result.counts_by_kind();
        assert_eq!(counts.get(&IssueKind::MissingColumn), Some(&2));
        assert_eq!(counts.get(&IssueKind::Missingness), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 3);
    }
}
