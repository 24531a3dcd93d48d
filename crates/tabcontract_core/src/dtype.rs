//! Canonical column type classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical column type tag.
///
/// Data sources report a raw, library-specific type name for each column
/// (`"int64"`, `"object"`, `"LargeUtf8"`, ...). [`DType::from_declared`]
/// folds those names into this closed set, and every downstream check
/// switches on the tag rather than re-inspecting values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// Signed or unsigned integers of any width
    Integer,
    /// Floating point numbers
    Float,
    /// Booleans
    Boolean,
    /// Free-form text, whatever the physical encoding
    String,
    /// Dictionary-encoded / categorical values
    Categorical,
}

impl DType {
    /// Normalizes a raw declared type name into a canonical tag.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. All
    /// string-like encodings collapse into [`DType::String`]. Returns `None`
    /// when the name is not recognized.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tabcontract_core::DType;
    ///
    /// assert_eq!(DType::from_declared("Int64"), Some(DType::Integer));
    /// assert_eq!(DType::from_declared("object"), Some(DType::String));
    /// assert_eq!(DType::from_declared("LargeUtf8"), Some(DType::String));
    /// assert_eq!(DType::from_declared("list<item: utf8>"), None);
    /// ```
    pub fn from_declared(type_name: &str) -> Option<Self> {
        let normalized = type_name.trim().to_lowercase();

        let dtype = match normalized.as_str() {
            "int" | "integer" | "long" | "short" | "int8" | "int16" | "int32" | "int64"
            | "uint8" | "uint16" | "uint32" | "uint64" => DType::Integer,
            "float" | "double" | "real" | "float32" | "float64" => DType::Float,
            "bool" | "boolean" => DType::Boolean,
            "string" | "str" | "object" | "text" | "varchar" | "utf8" | "large_utf8"
            | "largeutf8" | "utf8_view" | "utf8view" => DType::String,
            "category" | "categorical" | "dictionary" => DType::Categorical,
            t if t.starts_with("dictionary(") || t.starts_with("dictionary<") => {
                DType::Categorical
            }
            _ => return None,
        };

        Some(dtype)
    }

    /// Returns true for integer and float columns.
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Integer | DType::Float)
    }

    /// Canonical lowercase tag.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::Integer => "integer",
            DType::Float => "float",
            DType::Boolean => "boolean",
            DType::String => "string",
            DType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
