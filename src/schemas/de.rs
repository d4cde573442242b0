//! Lenient deserializers for backend records, which mix numbers and strings freely.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a string or a number; `null` becomes the empty string.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).filter(|item| !item.is_empty()))
}

/// Accepts a JSON number or a numeric string; anything else reads as zero.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_amount(&value))
}

/// Accepts `"a,b"`, `["a", "b"]` or `[{"name": "a"}]`.
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::String(raw) => raw
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Value::Array(items) => items.iter().filter_map(display_name).collect(),
        _ => Vec::new(),
    };
    Ok(items)
}

pub(crate) fn value_to_amount(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(raw) => raw.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Record id under `_id` (Mongo style) or `id`.
pub(crate) fn record_id(value: &Value) -> Option<String> {
    value
        .get("_id")
        .and_then(scalar_to_string)
        .or_else(|| value.get("id").and_then(scalar_to_string))
        .filter(|id| !id.is_empty())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn display_name(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Object(_) => value
            .get("name")
            .or_else(|| value.get("subjectName"))
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}
