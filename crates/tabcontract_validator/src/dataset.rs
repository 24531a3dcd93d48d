//! Dataset representation for validation.
//!
//! The engine never reads values directly. It goes through
//! [`TabularSource`], a small capability interface that any tabular library
//! can satisfy. [`DataSet`] is the in-memory implementation.

use std::collections::{BTreeSet, HashSet};
use tabcontract_core::{ContractError, DType, Result};

/// Read-only access to a columnar, named, typed dataset.
pub trait TabularSource {
    /// Column names in dataset order.
    fn column_names(&self) -> Vec<String>;

    /// Total number of rows.
    fn row_count(&self) -> usize;

    /// Raw declared element type of a column, `None` if the column is absent.
    fn declared_type(&self, column: &str) -> Option<String>;

    /// Number of null (or NaN) entries in a column.
    fn null_count(&self, column: &str) -> Result<usize>;

    /// Minimum and maximum over non-null entries of a numeric column; `None`
    /// if every entry is null.
    fn numeric_bounds(&self, column: &str) -> Result<Option<(f64, f64)>>;

    /// Distinct non-null entries, coerced to strings.
    fn distinct_values(&self, column: &str) -> Result<BTreeSet<String>>;

    /// Returns true if the dataset has the column.
    fn has_column(&self, column: &str) -> bool {
        self.declared_type(column).is_some()
    }
}

/// A value in a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value; NaN counts as missing
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl DataValue {
    /// Returns true if this value is null or a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Bool(_) => "boolean",
        }
    }

    /// Attempts to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// String form used for categorical domains; `None` for missing values.
    pub fn to_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            DataValue::Null => None,
            DataValue::String(s) => Some(s.clone()),
            DataValue::Int(i) => Some(i.to_string()),
            DataValue::Float(f) => Some(f.to_string()),
            DataValue::Bool(b) => Some(b.to_string()),
        }
    }

    fn fits(&self, dtype: DType) -> bool {
        match (self, dtype) {
            (DataValue::Null, _) => true,
            (DataValue::Int(_), DType::Integer | DType::Float) => true,
            (DataValue::Float(_), DType::Float) => true,
            (DataValue::Bool(_), DType::Boolean) => true,
            (DataValue::String(_), DType::String | DType::Categorical) => true,
            _ => false,
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    declared_type: String,
    values: Vec<DataValue>,
}

impl Column {
    /// Creates a column with a raw declared type (e.g. `"int64"`, `"object"`).
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        values: Vec<DataValue>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            values,
        }
    }

    /// Integer column; `None` entries are null.
    pub fn int<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        Self::typed(name, "int64", values)
    }

    /// Float column; `None` and NaN entries are missing.
    pub fn float<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::typed(name, "float64", values)
    }

    /// Boolean column.
    pub fn boolean<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<bool>>,
    {
        Self::typed(name, "bool", values)
    }

    /// String column.
    pub fn string<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::typed(name, "string", values.into_iter().map(|v| v.map(Into::<String>::into)))
    }

    /// Categorical column.
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::typed(name, "category", values.into_iter().map(|v| v.map(Into::<String>::into)))
    }

    fn typed<I, T>(name: impl Into<String>, declared_type: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<DataValue>,
    {
        let values = values.into_iter().map(DataValue::from).collect();
        Self::new(name, declared_type, values)
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw declared type.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Column values.
    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    fn present(&self) -> impl Iterator<Item = &DataValue> {
        self.values.iter().filter(|v| !v.is_missing())
    }
}

/// An in-memory columnar dataset.
///
/// # Example
///
/// ```rust
/// use tabcontract_validator::{Column, DataSet, TabularSource};
///
/// let dataset = DataSet::new(vec![
///     Column::int("age", [Some(25), None, Some(30)]),
///     Column::string("city", ["Paris", "NYC", "Paris"].map(Some)),
/// ])
/// .unwrap();
///
/// assert_eq!(dataset.row_count(), 3);
/// assert_eq!(dataset.null_count("age").unwrap(), 1);
/// assert_eq!(dataset.numeric_bounds("age").unwrap(), Some((25.0, 30.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    columns: Vec<Column>,
    rows: usize,
}

impl DataSet {
    /// Creates a dataset from columns.
    ///
    /// # Errors
    ///
    /// - [`ContractError::DuplicateColumn`] if a name repeats
    /// - [`ContractError::RaggedColumns`] if lengths differ
    /// - [`ContractError::ValueTypeMismatch`] if a value does not fit its
    ///   column's declared type
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ContractError::DuplicateColumn(column.name.clone()));
            }
            if column.values.len() != rows {
                return Err(ContractError::RaggedColumns {
                    column: column.name.clone(),
                    expected: rows,
                    actual: column.values.len(),
                });
            }
            // Unrecognized declared types are reported by the consumers.
            if let Some(dtype) = DType::from_declared(&column.declared_type) {
                if let Some((row, value)) =
                    column.values.iter().enumerate().find(|(_, v)| !v.fits(dtype))
                {
                    return Err(ContractError::ValueTypeMismatch {
                        column: column.name.clone(),
                        row,
                        expected: dtype.to_string(),
                        actual: value.type_name().to_string(),
                    });
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Gets a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns an iterator over the columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| ContractError::UnknownColumn(name.to_string()))
    }
}

impl TabularSource for DataSet {
    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn declared_type(&self, column: &str) -> Option<String> {
        self.column(column).map(|c| c.declared_type.clone())
    }

    fn null_count(&self, column: &str) -> Result<usize> {
        let column = self.require(column)?;
        Ok(column.values.iter().filter(|v| v.is_missing()).count())
    }

    fn numeric_bounds(&self, column: &str) -> Result<Option<(f64, f64)>> {
        let column = self.require(column)?;
        if !DType::from_declared(&column.declared_type).is_some_and(DType::is_numeric) {
            return Err(ContractError::NotNumeric {
                column: column.name.clone(),
                type_name: column.declared_type.clone(),
            });
        }

        Ok(column
            .present()
            .filter_map(DataValue::as_float)
            .fold(None, |bounds, v| match bounds {
                None => Some((v, v)),
                Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
            }))
    }

    fn distinct_values(&self, column: &str) -> Result<BTreeSet<String>> {
        let column = self.require(column)?;
        Ok(column.present().filter_map(DataValue::to_text).collect())
    }
}
