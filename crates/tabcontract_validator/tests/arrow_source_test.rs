//! Inference and validation over Arrow record batches.

use arrow_array::{ArrayRef, Date32Array, Float64Array, Int64Array, RecordBatch, StringArray};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tabcontract_core::{DType, Evidence, IssueKind};
use tabcontract_validator::{RecordBatchSource, infer, validate};

fn orders(amounts: Vec<Option<f64>>, statuses: Vec<&str>) -> RecordBatchSource {
    let ids: Vec<i64> = (1..=amounts.len() as i64).collect();
    RecordBatch::try_from_iter([
        ("order_id", Arc::new(Int64Array::from(ids)) as ArrayRef),
        ("amount", Arc::new(Float64Array::from(amounts)) as ArrayRef),
        ("status", Arc::new(StringArray::from(statuses)) as ArrayRef),
    ])
    .map(RecordBatchSource::new)
    .unwrap()
}

#[test]
fn test_infer_from_record_batch() {
    let source = orders(vec![Some(10.0), None, Some(99.5)], vec!["open", "closed", "open"]);
    let contract = infer(&source).unwrap();

    assert_eq!(contract.get("order_id").unwrap().dtype(), DType::Integer);
    let amount = contract.get("amount").unwrap();
    assert_eq!(amount.dtype(), DType::Float);
    assert_eq!(amount.bounds(), (Some(10.0), Some(99.5)));
    assert!((amount.max_missing_frac() - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(contract.get("status").unwrap().dtype(), DType::String);
}

#[test]
fn test_validate_record_batch_against_baseline() {
    let baseline = orders(vec![Some(10.0), Some(20.0)], vec!["open", "closed"]);
    let contract = infer(&baseline).unwrap();
    assert!(validate(&baseline, &contract, true).unwrap().ok());

    let next = orders(vec![Some(5.0), None, Some(20.0)], vec!["open", "refunded", "open"]);
    let result = validate(&next, &contract, true).unwrap();
    let kinds: Vec<_> = result
        .issues()
        .iter()
        .map(|issue| (issue.column(), issue.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (Some("order_id"), IssueKind::Range),
            (Some("amount"), IssueKind::Missingness),
            (Some("amount"), IssueKind::Range),
            (Some("status"), IssueKind::Category),
        ]
    );
}

#[test]
fn test_date_column_against_integer_contract() {
    let baseline = orders(vec![Some(10.0)], vec!["open"]);
    let contract = infer(&baseline).unwrap();

    let next = RecordBatch::try_from_iter([
        ("order_id", Arc::new(Date32Array::from(vec![Some(19_000)])) as ArrayRef),
        ("amount", Arc::new(Float64Array::from(vec![Some(10.0)])) as ArrayRef),
        ("status", Arc::new(StringArray::from(vec!["open"])) as ArrayRef),
    ])
    .map(RecordBatchSource::new)
    .unwrap();

    let result = validate(&next, &contract, true).unwrap();
    assert_eq!(result.issues().len(), 1);
    let issue = &result.issues()[0];
    assert_eq!(issue.kind(), IssueKind::DType);
    assert_eq!(issue.column(), Some("order_id"));
    let tag = arrow_schema::DataType::Date32.to_string();
    assert_eq!(issue.observed(), &Evidence::DeclaredType(tag));
}
