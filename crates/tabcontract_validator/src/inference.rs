//! Contract inference from a dataset snapshot.

use crate::TabularSource;
use tabcontract_core::{
    ColumnRule, Contract, ContractBuilder, ContractError, DEFAULT_CONTRACT_NAME, DType, Result,
};
use tracing::{debug, info};

/// Infers a contract describing `dataset` exactly, under the default name.
///
/// See [`infer_named`].
pub fn infer<S: TabularSource + ?Sized>(dataset: &S) -> Result<Contract> {
    infer_named(dataset, DEFAULT_CONTRACT_NAME)
}

/// Infers a contract describing `dataset` exactly.
///
/// For every column, in dataset order:
///
/// - the dtype comes from the column's declared type
/// - `max_missing_frac` is the observed null fraction (0 for an empty dataset)
/// - numeric columns get the observed min/max, left unset when every entry
///   is null
/// - other columns get their distinct non-null values as the allowed domain
///
/// Validating the same dataset against the result in strict mode reports no
/// issues.
///
/// # Errors
///
/// Returns [`ContractError::UnsupportedType`] if a declared type is not
/// recognized.
///
/// # Example
///
/// ```rust
/// use tabcontract_validator::{infer, Column, DataSet};
///
/// let dataset = DataSet::new(vec![
///     Column::int("age", [Some(25), Some(40), None, Some(31)]),
///     Column::string("city", ["NYC", "SF", "NYC", "LA"].map(Some)),
/// ])
/// .unwrap();
///
/// let contract = infer(&dataset).unwrap();
/// let age = contract.get("age").unwrap();
/// assert_eq!(age.bounds(), (Some(25.0), Some(40.0)));
/// assert_eq!(age.max_missing_frac(), 0.25);
/// assert_eq!(contract.get("city").unwrap().allowed_values().map(|v| v.len()), Some(3));
/// ```
pub fn infer_named<S: TabularSource + ?Sized>(
    dataset: &S,
    name: impl Into<String>,
) -> Result<Contract> {
    let name = name.into();
    let columns = dataset.column_names();
    info!(
        "Inferring contract '{}' from {} columns, {} rows",
        name,
        columns.len(),
        dataset.row_count()
    );

    let rules = columns
        .into_iter()
        .map(|column| {
            let rule = infer_column(dataset, &column)?;
            Ok((column, rule))
        })
        .collect::<Result<Vec<_>>>()?;

    ContractBuilder::new(name).columns(rules).build()
}

fn infer_column<S: TabularSource + ?Sized>(dataset: &S, column: &str) -> Result<ColumnRule> {
    let declared = dataset
        .declared_type(column)
        .ok_or_else(|| ContractError::UnknownColumn(column.to_string()))?;
    let dtype = DType::from_declared(&declared)
        .ok_or_else(|| ContractError::unsupported_type(column, &declared))?;

    let rows = dataset.row_count();
    let missing_frac = if rows == 0 {
        0.0
    } else {
        dataset.null_count(column)? as f64 / rows as f64
    };

    let rule = if dtype.is_numeric() {
        let bounds = dataset.numeric_bounds(column)?;
        ColumnRule::numeric(
            dtype,
            missing_frac,
            bounds.map(|(min, _)| min),
            bounds.map(|(_, max)| max),
        )
    } else {
        let values = dataset.distinct_values(column)?;
        ColumnRule::categorical(dtype, missing_frac, Some(values))
    };

    debug!("Inferred column '{}' as {} ({})", column, dtype, declared);
    Ok(rule)
}
