//! Small helpers shared by the models

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Today's date in local time, the default for bill dates
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Normalize an item name for merge comparisons (trimmed, lower-cased)
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim a string, mapping blank input to `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Deserialize an integer that the backend may send as a number or a numeric string
///
/// Table floors come back as `"2"` from some endpoints and `2` from others.
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => i32::try_from(v).map_err(D::Error::custom),
        IntOrString::Float(v) if v.fract() == 0.0 => Ok(v as i32),
        IntOrString::Float(v) => Err(D::Error::custom(format!("expected integer, got {}", v))),
        IntOrString::Str(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid integer {:?}: {}", s, e))),
    }
}
