//! Serde helpers for numeric bounds.
//!
//! Inferred bounds may be infinite, which JSON cannot hold as a number.
//! Infinite bounds are written as the strings `"inf"` and `"-inf"`; finite
//! bounds stay plain numbers in every format.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub(crate) fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        None => serializer.serialize_none(),
        Some(v) if v.is_finite() || v.is_nan() => serializer.serialize_some(v),
        Some(v) if *v > 0.0 => serializer.serialize_some("inf"),
        Some(_) => serializer.serialize_some("-inf"),
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Number(v)) => Ok(Some(v)),
        Some(Repr::Text(text)) => match text.trim().to_lowercase().as_str() {
            "inf" | "+inf" | "infinity" => Ok(Some(f64::INFINITY)),
            "-inf" | "-infinity" => Ok(Some(f64::NEG_INFINITY)),
            other => Err(D::Error::custom(format!("invalid bound '{other}'"))),
        },
    }
}
