use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::error::AttributeError;

/// A flat settings mapping as stored in one attribute group.
pub type Settings = Map<String, Value>;

/// Attributes attached to one container node: group name to JSON text.
///
/// This is the on-disk view. Scalar root attributes (`date_utc`,
/// `file_name`, ...) are kept as plain strings; settings groups hold JSON
/// object text.
pub type AttributeSet = BTreeMap<String, String>;

/// Encode a settings mapping as canonical JSON text.
///
/// Keys are emitted in sorted order and nested objects are indented with
/// four spaces, so the same mapping always produces the same bytes.
pub fn encode_settings(settings: &Settings) -> Result<String, AttributeError> {
    encode_value(&Value::Object(settings.clone()))
}

/// Encode any serializable value as canonical JSON text.
pub fn encode_value<T: Serialize>(value: &T) -> Result<String, AttributeError> {
    let value = canonicalize(serde_json::to_value(value)?);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Rebuild every object with its keys inserted in sorted order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Decode JSON text into a settings mapping.
///
/// Empty text and a JSON `null` decode to an empty mapping.
pub fn decode_settings(group: &str, text: &str) -> Result<Settings, AttributeError> {
    if text.trim().is_empty() {
        return Ok(Settings::new());
    }
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Settings::new()),
        _ => Err(AttributeError::NotAnObject {
            group: group.to_string(),
        }),
    }
}

/// Read a settings group from a node's attributes.
///
/// A missing group yields an empty mapping rather than an error.
pub fn read_group(attrs: &AttributeSet, group: &str) -> Result<Settings, AttributeError> {
    match attrs.get(group) {
        Some(text) => decode_settings(group, text),
        None => Ok(Settings::new()),
    }
}

/// Read one key out of a settings group, `None` when the group or key is absent.
pub fn read_group_key(
    attrs: &AttributeSet,
    group: &str,
    key: &str,
) -> Result<Option<Value>, AttributeError> {
    let mut settings = read_group(attrs, group)?;
    Ok(settings.remove(key))
}

/// Store a settings group on a node's attributes, replacing any previous text.
pub fn write_group(
    attrs: &mut AttributeSet,
    group: &str,
    settings: &Settings,
) -> Result<(), AttributeError> {
    attrs.insert(group.to_string(), encode_settings(settings)?);
    Ok(())
}
