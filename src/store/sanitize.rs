use serde::Serialize;
use serde_json::Value;
use snafu::ResultExt;

use super::error::{Result, SerializeSnafu};

/// Strip entries the remote store cannot represent from a write payload.
///
/// Object keys holding `null` (absent optional fields) are removed
/// recursively. `null` array *elements* are kept: positions matter there.
/// Applied to every remote write payload, never to read results.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .filter(|(_, entry)| !entry.is_null())
                .map(|(key, entry)| (key, sanitize(entry)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        other => other,
    }
}

/// Serialize a payload and sanitize it in one step.
pub fn sanitized_value<T: Serialize>(payload: &T) -> Result<Value> {
    let value = serde_json::to_value(payload).context(SerializeSnafu)?;
    Ok(sanitize(value))
}
