//! Data contract types and structures.
//!
//! A contract is an ordered set of per-column expectations: the column's
//! canonical type, how much missingness is tolerated, and either numeric
//! bounds or a categorical domain.

use crate::{ContractError, DType, Result};
use indexmap::IndexMap;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Name given to contracts that were not explicitly named.
pub const DEFAULT_CONTRACT_NAME: &str = "contract";

/// Expectations for a single column.
///
/// A `ColumnRule` is immutable once built. Numeric rules carry optional
/// `min_value`/`max_value` bounds, non-numeric rules carry an optional set of
/// allowed values; the two shapes never mix.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{ColumnRule, DType};
///
/// let age = ColumnRule::numeric(DType::Integer, 0.0, Some(18.0), Some(99.0));
/// assert_eq!(age.bounds(), (Some(18.0), Some(99.0)));
/// assert!(age.allowed_values().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    dtype: DType,

    #[serde(default)]
    max_missing_frac: f64,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::bound")]
    min_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::bound")]
    max_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_values: Option<BTreeSet<String>>,
}

impl ColumnRule {
    /// Creates a rule for a numeric column.
    ///
    /// Values are not range-checked here; use [`ColumnRule::check`] or
    /// [`ColumnRuleBuilder`](crate::ColumnRuleBuilder) for that.
    pub fn numeric(
        dtype: DType,
        max_missing_frac: f64,
        min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> Self {
        Self {
            dtype,
            max_missing_frac,
            min_value,
            max_value,
            allowed_values: None,
        }
    }

    /// Creates a rule for a string, boolean or categorical column.
    pub fn categorical(
        dtype: DType,
        max_missing_frac: f64,
        allowed_values: Option<BTreeSet<String>>,
    ) -> Self {
        Self {
            dtype,
            max_missing_frac,
            min_value: None,
            max_value: None,
            allowed_values,
        }
    }

    pub(crate) fn from_parts(
        dtype: DType,
        max_missing_frac: f64,
        min_value: Option<f64>,
        max_value: Option<f64>,
        allowed_values: Option<BTreeSet<String>>,
    ) -> Self {
        Self {
            dtype,
            max_missing_frac,
            min_value,
            max_value,
            allowed_values,
        }
    }

    /// Canonical column type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Maximum tolerated fraction of null entries.
    pub fn max_missing_frac(&self) -> f64 {
        self.max_missing_frac
    }

    /// Lower bound, if any.
    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    /// Upper bound, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    /// Both bounds as a pair.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.min_value, self.max_value)
    }

    /// Allowed values, if a domain is declared.
    pub fn allowed_values(&self) -> Option<&BTreeSet<String>> {
        self.allowed_values.as_ref()
    }

    /// Checks that the rule is well-formed.
    ///
    /// # Errors
    ///
    /// - [`ContractError::MalformedRule`] if numeric bounds appear on a
    ///   non-numeric rule, allowed values on a numeric rule, or a bound is NaN
    /// - [`ContractError::InvalidMissingFraction`] if `max_missing_frac` is not
    ///   a finite number in [0, 1]
    /// - [`ContractError::InvertedBounds`] if `min_value > max_value`
    pub fn check(&self, column: &str) -> Result<()> {
        if self.dtype.is_numeric() {
            if self.allowed_values.as_ref().is_some_and(|v| !v.is_empty()) {
                return Err(ContractError::malformed(
                    column,
                    format!("allowed_values are not applicable to {} columns", self.dtype),
                ));
            }
        } else if self.min_value.is_some() || self.max_value.is_some() {
            return Err(ContractError::malformed(
                column,
                format!("numeric bounds are not applicable to {} columns", self.dtype),
            ));
        }

        if !self.max_missing_frac.is_finite() || !(0.0..=1.0).contains(&self.max_missing_frac) {
            return Err(ContractError::InvalidMissingFraction {
                column: column.to_string(),
                value: self.max_missing_frac,
            });
        }

        if self.min_value.is_some_and(f64::is_nan) || self.max_value.is_some_and(f64::is_nan) {
            return Err(ContractError::malformed(column, "bounds must not be NaN"));
        }

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(ContractError::InvertedBounds {
                    column: column.to_string(),
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}

/// A data contract: an ordered mapping from column name to [`ColumnRule`].
///
/// Column order follows insertion order and only matters for display and
/// for the order in which per-column issues are reported.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::{ColumnRule, ContractBuilder, DType};
///
/// let contract = ContractBuilder::new("users")
///     .column("age", ColumnRule::numeric(DType::Integer, 0.0, Some(0.0), Some(120.0)))
///     .column("city", ColumnRule::categorical(DType::String, 0.1, None))
///     .build()
///     .unwrap();
///
/// assert_eq!(contract.column_names(), vec!["age", "city"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContractDef")]
pub struct Contract {
    name: String,
    columns: IndexMap<String, ColumnRule>,
}

impl Contract {
    /// Creates an empty contract with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Contract name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the rule for a column.
    pub fn get(&self, column: &str) -> Option<&ColumnRule> {
        self.columns.get(column)
    }

    /// Returns true if the contract declares the column.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Iterates over `(name, rule)` pairs in contract order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnRule)> {
        self.columns.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Column names in contract order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the contract declares no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Checks every rule for well-formedness, in contract order.
    pub fn check(&self) -> Result<()> {
        self.iter().try_for_each(|(name, rule)| rule.check(name))
    }

    pub(crate) fn insert(&mut self, column: String, rule: ColumnRule) -> Result<()> {
        if self.columns.contains_key(&column) {
            return Err(ContractError::DuplicateColumn(column));
        }
        self.columns.insert(column, rule);
        Ok(())
    }
}

impl Default for Contract {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRACT_NAME)
    }
}

/// Serialized form of a contract, checked on the way in.
#[derive(Deserialize)]
struct ContractDef {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default, deserialize_with = "column_entries")]
    columns: Vec<(String, ColumnRule)>,
}

fn default_name() -> String {
    DEFAULT_CONTRACT_NAME.to_string()
}

/// Reads the `columns` map as raw entries so repeated keys reach
/// [`Contract::insert`] instead of overwriting each other.
fn column_entries<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, ColumnRule)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, ColumnRule)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of column names to rules")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

impl TryFrom<ContractDef> for Contract {
    type Error = ContractError;

    fn try_from(def: ContractDef) -> Result<Self> {
        let mut contract = Contract::new(def.name);
        for (column, rule) in def.columns {
            contract.insert(column, rule)?;
        }
        contract.check()?;
        Ok(contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_rule_shape() {
        let rule = ColumnRule::numeric(DType::Float, 0.25, Some(-1.0), Some(1.0));
        assert_eq!(rule.dtype(), DType::Float);
        assert_eq!(rule.max_missing_frac(), 0.25);
        assert_eq!(rule.bounds(), (Some(-1.0), Some(1.0)));
        assert!(rule.allowed_values().is_none());
        assert!(rule.check("score").is_ok());
    }

    #[test]
    fn test_categorical_rule_shape() {
        let rule = ColumnRule::categorical(DType::String, 0.0, Some(values(&["NYC", "SF"])));
        assert_eq!(rule.bounds(), (None, None));
        assert_eq!(rule.allowed_values(), Some(&values(&["SF", "NYC"])));
        assert!(rule.check("city").is_ok());
    }

    #[test]
    fn test_check_rejects_out_of_range_fraction() {
        let rule = ColumnRule::numeric(DType::Integer, 1.5, None, None);
        assert!(matches!(
            rule.check("age"),
            Err(ContractError::InvalidMissingFraction { .. })
        ));

        let rule = ColumnRule::numeric(DType::Integer, f64::NAN, None, None);
        assert!(rule.check("age").unwrap_err().is_value_error());
    }

    #[test]
    fn test_check_rejects_inverted_bounds() {
        let rule = ColumnRule::numeric(DType::Integer, 0.0, Some(10.0), Some(1.0));
        let err = rule.check("age").unwrap_err();
        assert_eq!(
            err,
            ContractError::InvertedBounds {
                column: "age".into(),
                min: 10.0,
                max: 1.0,
            }
        );
    }

    #[test]
    fn test_check_allows_single_bound() {
        let rule = ColumnRule::numeric(DType::Integer, 0.0, Some(10.0), None);
        assert!(rule.check("age").is_ok());
    }

    #[test]
    fn test_check_rejects_mixed_shape() {
        let rule = ColumnRule {
            dtype: DType::Boolean,
            max_missing_frac: 0.0,
            min_value: Some(0.0),
            max_value: Some(1.0),
            allowed_values: None,
        };
        assert!(rule.check("flag").unwrap_err().is_type_error());

        let rule = ColumnRule {
            dtype: DType::Integer,
            max_missing_frac: 0.0,
            min_value: None,
            max_value: None,
            allowed_values: Some(values(&["1"])),
        };
        assert!(rule.check("count").unwrap_err().is_type_error());
    }

    #[test]
    fn test_contract_rejects_duplicates() {
        let mut contract = Contract::default();
        let rule = ColumnRule::numeric(DType::Integer, 0.0, None, None);
        contract.insert("id".into(), rule.clone()).unwrap();
        let err = contract.insert("id".into(), rule).unwrap_err();
        assert_eq!(err, ContractError::DuplicateColumn("id".into()));
        assert_eq!(contract.len(), 1);
    }

    #[test]
    fn test_contract_preserves_order() {
        let mut contract = Contract::new("ordered");
        for name in ["zeta", "alpha", "mid"] {
            contract
                .insert(name.into(), ColumnRule::categorical(DType::String, 0.0, None))
                .unwrap();
        }
        assert_eq!(contract.column_names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(contract.name(), "ordered");
    }

    #[test]
    fn test_deserialize_defaults_and_checks() {
        let json = r#"{"columns": {"age": {"dtype": "integer", "min_value": 0, "max_value": 9}}}"#;
        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.name(), DEFAULT_CONTRACT_NAME);
        let age = contract.get("age").unwrap();
        assert_eq!(age.max_missing_frac(), 0.0);
        assert_eq!(age.bounds(), (Some(0.0), Some(9.0)));

        let json = r#"{"columns": {"age": {"dtype": "integer", "max_missing_frac": 2.0}}}"#;
        let result: std::result::Result<Contract, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_repeated_column() {
        let json = r#"{"columns": {"age": {"dtype": "integer"}, "age": {"dtype": "string"}}}"#;
        let err = serde_json::from_str::<Contract>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate column name: age"), "{err}");
    }

    #[test]
    fn test_deserialize_keeps_file_order() {
        let json = r#"{"columns": {"z": {"dtype": "boolean"}, "a": {"dtype": "boolean"}}}"#;
        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.column_names(), vec!["z", "a"]);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let mut contract = Contract::default();
        contract
            .insert("city".into(), ColumnRule::categorical(DType::String, 0.0, None))
            .unwrap();
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "contract",
                "columns": {"city": {"dtype": "string", "max_missing_frac": 0.0}}
            })
        );
    }
}
