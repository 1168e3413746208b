//! Tolerant field deserializers.
//!
//! Requirement files are written by hand and shipped inside plugins, so a
//! single badly shaped value must not throw away the rest of the document.
//! Each helper here reads the raw JSON value and keeps only what has the
//! expected shape; anything else becomes "absent".

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a version leaf: a non-empty string, or a number rendered as text.
pub(crate) fn version_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Optional version string.
pub fn version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(version_value(&value))
}

/// Read free-form text: a non-empty string, or a number rendered as text.
pub(crate) fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a list of names. A lone string counts as a one-element list;
/// non-string and empty entries are skipped.
pub(crate) fn names_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Ordered list of names, see [`names_value`].
pub fn names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(names_value(&value))
}

/// Mapping of slug to required version, in document order.
///
/// Every slug is kept. A value that is not a version means "any version",
/// so the entry still asks for the slug to be present.
pub fn version_map<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(entries) = value else {
        return Ok(IndexMap::new());
    };

    Ok(entries
        .into_iter()
        .map(|(slug, version)| (slug, version_value(&version)))
        .collect())
}

/// Like [`version_map`], but skips falsy slugs (`""` and `"0"`).
pub fn plugin_map<'de, D>(deserializer: D) -> Result<IndexMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut map = version_map(deserializer)?;
    map.retain(|slug, _| !slug.is_empty() && slug != "0");
    Ok(map)
}

/// Truthiness of a scalar, the way a loosely typed config file means it.
/// `null` is "not set".
pub(crate) fn truthy_value(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(!s.is_empty() && s != "0"),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(_) => Some(true),
    }
}

/// A nested section. Anything that is not an object, or fails to parse,
/// is dropped.
pub fn section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(T::deserialize(value).ok())
}

/// A nested object that falls back to its default when malformed.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value).unwrap_or_default())
}
