//! Arrow `RecordBatch` adapter.
//!
//! Exposes an in-memory Arrow batch through [`TabularSource`] so contracts
//! can be inferred from and checked against columnar data without copying it
//! into a [`DataSet`](crate::DataSet).

use crate::TabularSource;
use arrow_array::cast::AsArray;
use arrow_array::{
    Array, BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array,
    Int64Array, LargeStringArray, RecordBatch, StringArray, StringViewArray, UInt8Array,
    UInt16Array, UInt32Array, UInt64Array,
};
use arrow_schema::DataType;
use std::collections::BTreeSet;
use tabcontract_core::{ContractError, Result};

/// A [`TabularSource`] backed by an Arrow [`RecordBatch`].
///
/// Supported column types are the signed and unsigned integers, `Float32`,
/// `Float64`, `Boolean`, `Utf8`, `LargeUtf8`, `Utf8View` and dictionaries
/// over any of those. Other types are reported under their Arrow name and
/// fail dtype normalization.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
/// use tabcontract_validator::{RecordBatchSource, TabularSource};
///
/// let batch = RecordBatch::try_from_iter([
///     ("id", Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])) as ArrayRef),
///     ("city", Arc::new(StringArray::from(vec!["NYC", "SF", "NYC"])) as ArrayRef),
/// ])
/// .unwrap();
///
/// let source = RecordBatchSource::new(batch);
/// assert_eq!(source.declared_type("id").as_deref(), Some("int64"));
/// assert_eq!(source.null_count("id").unwrap(), 1);
/// assert_eq!(source.distinct_values("city").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RecordBatchSource {
    batch: RecordBatch,
}

impl RecordBatchSource {
    /// Wraps a record batch.
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// The wrapped batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    fn require(&self, column: &str) -> Result<&dyn Array> {
        self.batch
            .column_by_name(column)
            .map(|array| array.as_ref())
            .ok_or_else(|| ContractError::UnknownColumn(column.to_string()))
    }
}

impl From<RecordBatch> for RecordBatchSource {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

impl TabularSource for RecordBatchSource {
    fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    fn declared_type(&self, column: &str) -> Option<String> {
        self.batch
            .column_by_name(column)
            .map(|array| type_tag(array.data_type()))
    }

    fn null_count(&self, column: &str) -> Result<usize> {
        let array = self.require(column)?;
        match array.data_type() {
            DataType::Float32 | DataType::Float64 | DataType::Dictionary(_, _) => {
                Ok(texts(column, array)?.iter().filter(|v| v.is_none()).count())
            }
            _ => Ok(array.null_count()),
        }
    }

    fn numeric_bounds(&self, column: &str) -> Result<Option<(f64, f64)>> {
        let array = self.require(column)?;

        macro_rules! bounds {
            ($ty:ty) => {
                fold_bounds(
                    downcast::<$ty>(column, array)?
                        .iter()
                        .flatten()
                        .map(|v| v as f64),
                )
            };
        }

        let bounds = match array.data_type() {
            DataType::Int8 => bounds!(Int8Array),
            DataType::Int16 => bounds!(Int16Array),
            DataType::Int32 => bounds!(Int32Array),
            DataType::Int64 => bounds!(Int64Array),
            DataType::UInt8 => bounds!(UInt8Array),
            DataType::UInt16 => bounds!(UInt16Array),
            DataType::UInt32 => bounds!(UInt32Array),
            DataType::UInt64 => bounds!(UInt64Array),
            DataType::Float32 => bounds!(Float32Array),
            DataType::Float64 => bounds!(Float64Array),
            other => {
                return Err(ContractError::NotNumeric {
                    column: column.to_string(),
                    type_name: type_tag(other),
                });
            }
        };
        Ok(bounds)
    }

    fn distinct_values(&self, column: &str) -> Result<BTreeSet<String>> {
        let array = self.require(column)?;
        Ok(texts(column, array)?.into_iter().flatten().collect())
    }
}

/// Raw type tag for an Arrow type, in the vocabulary `DType::from_declared`
/// understands.
fn type_tag(data_type: &DataType) -> String {
    let tag = match data_type {
        DataType::Int8 => "int8",
        DataType::Int16 => "int16",
        DataType::Int32 => "int32",
        DataType::Int64 => "int64",
        DataType::UInt8 => "uint8",
        DataType::UInt16 => "uint16",
        DataType::UInt32 => "uint32",
        DataType::UInt64 => "uint64",
        DataType::Float32 => "float32",
        DataType::Float64 => "float64",
        DataType::Boolean => "boolean",
        DataType::Utf8 => "utf8",
        DataType::LargeUtf8 => "large_utf8",
        DataType::Utf8View => "utf8_view",
        DataType::Dictionary(_, _) => "dictionary",
        other => return other.to_string(),
    };
    tag.to_string()
}

fn downcast<'a, T: Array + 'static>(column: &str, array: &'a dyn Array) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ContractError::unsupported_type(column, array.data_type().to_string()))
}

fn fold_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |bounds, v| match bounds {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

/// Row-wise string form of a column; `None` marks null and NaN entries.
fn texts(column: &str, array: &dyn Array) -> Result<Vec<Option<String>>> {
    macro_rules! collect {
        ($ty:ty) => {
            downcast::<$ty>(column, array)?
                .iter()
                .map(|v| v.map(|v| v.to_string()))
                .collect()
        };
        ($ty:ty, float) => {
            downcast::<$ty>(column, array)?
                .iter()
                .map(|v| v.filter(|f| !f.is_nan()).map(|f| f.to_string()))
                .collect()
        };
    }

    let texts = match array.data_type() {
        DataType::Int8 => collect!(Int8Array),
        DataType::Int16 => collect!(Int16Array),
        DataType::Int32 => collect!(Int32Array),
        DataType::Int64 => collect!(Int64Array),
        DataType::UInt8 => collect!(UInt8Array),
        DataType::UInt16 => collect!(UInt16Array),
        DataType::UInt32 => collect!(UInt32Array),
        DataType::UInt64 => collect!(UInt64Array),
        DataType::Float32 => collect!(Float32Array, float),
        DataType::Float64 => collect!(Float64Array, float),
        DataType::Boolean => collect!(BooleanArray),
        DataType::Utf8 => collect!(StringArray),
        DataType::LargeUtf8 => collect!(LargeStringArray),
        DataType::Utf8View => collect!(StringViewArray),
        DataType::Dictionary(_, _) => {
            let dictionary = array.as_any_dictionary_opt().ok_or_else(|| {
                ContractError::unsupported_type(column, array.data_type().to_string())
            })?;
            let values = texts(column, dictionary.values().as_ref())?;
            dictionary
                .normalized_keys()
                .into_iter()
                .enumerate()
                .map(|(row, key)| {
                    if dictionary.is_null(row) {
                        None
                    } else {
                        values.get(key).cloned().flatten()
                    }
                })
                .collect()
        }
        other => return Err(ContractError::unsupported_type(column, other.to_string())),
    };
    Ok(texts)
}
