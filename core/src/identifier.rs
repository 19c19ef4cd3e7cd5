//! Identifier extraction from object-or-id references.

use crate::error::{Error, Result};
use crate::value::Value;

/// Extract the identifier a reference points at.
///
/// An object exposing an id yields that id, a record with an `id` key yields
/// its value, and anything else is assumed to already be an identifier and is
/// returned unchanged.
pub fn resolve(value: Value) -> Value {
    match value {
        Value::Object(object) => match object.id() {
            Some(id) => id,
            None => Value::Object(object),
        },
        Value::Record(mut record) => match record.remove("id") {
            Some(id) => id,
            None => Value::Record(record),
        },
        other => other,
    }
}

/// Whether an argument under `key` names another resource.
pub fn is_identifier_key(key: &str) -> bool {
    key == "older_than" || key == "newer_than" || key.ends_with("_id")
}

/// Resolve a reference and render it for a URL path such as `/users/{id}`.
pub fn path_segment(value: impl Into<Value>) -> Result<String> {
    match resolve(value.into()) {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) if !s.is_empty() && !s.contains('/') => Ok(s),
        other => Err(Error::InvalidIdentifier(other.kind().to_string())),
    }
}
