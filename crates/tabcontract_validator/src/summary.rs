//! Severity-based summarization of validation results.

use tabcontract_core::{Issue, Result, Summary, SummaryOptions, ValidationResult};
use tracing::info;

/// Ranks a result's issues by severity and keeps the top `options.top_k`.
///
/// Issues are ordered by weight (highest first), then by column with
/// dataset-level issues first, then by kind tag; equal issues keep their
/// detection order. `counts_by_kind` always covers every issue.
///
/// # Errors
///
/// Returns [`ContractError::InvalidTopK`](tabcontract_core::ContractError::InvalidTopK)
/// or [`ContractError::InvalidWeight`](tabcontract_core::ContractError::InvalidWeight)
/// before any ranking happens.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{Issue, IssueKind, SummaryOptions, ValidationResult};
/// use tabcontract_validator::summarize;
///
/// let result = ValidationResult::from_issues(vec![
///     Issue::missingness("age", 0.0, 0.5),
///     Issue::missing_column("id"),
/// ]);
///
/// let summary = summarize(&result, &SummaryOptions::new().with_top_k(1)).unwrap();
/// assert_eq!(summary.top_issues[0].kind(), IssueKind::MissingColumn);
/// assert_eq!(summary.total_issues(), 2);
/// ```
pub fn summarize(result: &ValidationResult, options: &SummaryOptions) -> Result<Summary> {
    options.check()?;
    let weights = options.effective_weights();

    let mut ranked: Vec<&Issue> = result.issues().iter().collect();
    ranked.sort_by(|a, b| {
        weights
            .weight(b.kind())
            .total_cmp(&weights.weight(a.kind()))
            .then_with(|| a.column().cmp(&b.column()))
            .then_with(|| a.kind().cmp(&b.kind()))
    });

    let top_issues: Vec<Issue> = ranked.into_iter().take(options.top_k).cloned().collect();
    info!(
        "Summarized {} issues, keeping {}",
        result.issues().len(),
        top_issues.len()
    );

    Ok(Summary {
        ok: result.ok(),
        top_issues,
        counts_by_kind: result.counts_by_kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcontract_core::{ContractError, DType, Evidence, IssueKind, SeverityWeights};

    fn dataset_level(kind: IssueKind, message: &str) -> Issue {
        Issue::new(kind, None, message, Evidence::Absent, Evidence::Present)
    }

    #[test]
    fn test_empty_result() {
        let summary = summarize(&ValidationResult::success(), &SummaryOptions::default()).unwrap();
        assert!(summary.ok);
        assert!(summary.top_issues.is_empty());
        assert!(summary.counts_by_kind.is_empty());
    }

    #[test]
    fn test_dataset_level_issues_rank_first_among_equals() {
        let result = ValidationResult::from_issues(vec![
            Issue::dtype("b", DType::Integer, DType::String),
            Issue::dtype("a", DType::Integer, DType::String),
            dataset_level(IssueKind::DType, "whole table"),
        ]);
        let summary = summarize(&result, &SummaryOptions::default()).unwrap();
        let columns: Vec<_> = summary.top_issues.iter().map(|i| i.column()).collect();
        assert_eq!(columns, vec![None, Some("a"), Some("b")]);
    }

    #[test]
    fn test_kind_breaks_ties_then_detection_order() {
        let on_x = |kind: IssueKind, message: &str| {
            Issue::new(kind, Some("x".into()), message, Evidence::Absent, Evidence::Absent)
        };
        let result = ValidationResult::from_issues(vec![
            on_x(IssueKind::Range, "first"),
            on_x(IssueKind::Range, "second"),
            on_x(IssueKind::Category, "cat"),
        ]);

        let summary = summarize(&result, &SummaryOptions::default()).unwrap();
        let messages: Vec<_> = summary.top_issues.iter().map(|i| i.message()).collect();
        assert_eq!(messages, vec!["cat", "first", "second"]);
    }

    #[test]
    fn test_custom_weights_replace_defaults() {
        let result = ValidationResult::from_issues(vec![
            Issue::missing_column("id"),
            Issue::missingness("age", 0.0, 0.5),
        ]);
        let options = SummaryOptions::new()
            .with_weights(SeverityWeights::from_pairs([(IssueKind::Missingness, 2.0)]));

        let summary = summarize(&result, &options).unwrap();
        assert_eq!(summary.top_issues[0].kind(), IssueKind::Missingness);
    }

    #[test]
    fn test_invalid_options() {
        let result = ValidationResult::success();
        assert_eq!(
            summarize(&result, &SummaryOptions::new().with_top_k(0)),
            Err(ContractError::InvalidTopK(0))
        );
        let options = SummaryOptions::new()
            .with_weights(SeverityWeights::from_pairs([(IssueKind::Range, -1.0)]));
        assert!(summarize(&result, &options).unwrap_err().is_value_error());
    }
}
