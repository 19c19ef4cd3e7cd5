//! Argument values accepted by API calls and the flat parameters sent on the
//! wire.
//!
//! # Design
//! Endpoint methods take typed options, but each one lowers its options into
//! [`CallArguments`]: a map of loosely-typed [`Value`]s that may nest, hold
//! booleans or be absent. The [`Pipeline`](crate::Pipeline) turns those into
//! [`FlatParameters`], the only shape a [`Transport`](crate::Transport)
//! accepts. Both maps are key-ordered so the same call always produces the
//! same request.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Number;

/// A nested record argument.
pub type Record = BTreeMap<String, Value>;

/// Something that may expose an `id`, such as a model returned by an earlier
/// call. Passing one where an identifier is expected uses its id.
pub trait Identifiable: fmt::Debug + Send + Sync {
    fn id(&self) -> Option<Value>;
}

/// A single argument value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value supplied. Dropped before the request is sent.
    #[default]
    Absent,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Record(Record),
    Object(Arc<dyn Identifiable>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Wrap an identifiable object.
    pub fn object(object: impl Identifiable + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

/// JSON `null` becomes [`Value::Absent`].
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Arguments of a single API call, before conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments(BTreeMap<String, Value>);

impl CallArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl IntoIterator for CallArguments {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for CallArguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A JSON object literal converts key by key; anything else yields no
/// arguments.
impl From<serde_json::Value> for CallArguments {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => {
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
            }
            _ => Self::default(),
        }
    }
}

/// A wire-ready parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    String(String),
    Number(Number),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::String(s) => f.write_str(s),
            Param::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::String(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::String(value)
    }
}

macro_rules! param_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Param::Number(Number::from(value))
                }
            }
        )*
    };
}

param_from_integer!(i32, i64, u32, u64);

/// Flat, string-keyed parameters sent as a query string or form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatParameters(BTreeMap<String, Param>);

impl FlatParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Param>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Param)> {
        self.0.iter()
    }

    /// Key/value pairs rendered as strings, in key order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
    }

    /// `application/x-www-form-urlencoded` rendering, also valid as a query
    /// string.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }
}

impl FromIterator<(String, Param)> for FlatParameters {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn none_becomes_absent() {
        let value: Value = Option::<i64>::None.into();
        assert!(value.is_absent());
        let value: Value = Some("hi").into();
        assert_eq!(value, Value::String("hi".to_string()));
    }

    #[test]
    fn json_null_becomes_absent_and_objects_become_records() {
        let value = Value::from(json!({"url": "u", "fetch": true, "meta": null}));
        let Value::Record(record) = value else {
            panic!("expected record");
        };
        assert_eq!(record["url"], Value::from("u"));
        assert_eq!(record["fetch"], Value::Bool(true));
        assert!(record["meta"].is_absent());
    }

    #[test]
    fn call_arguments_from_json_object() {
        let args = CallArguments::from(json!({"body": "Hi", "limit": 5}));
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("limit"), Some(&Value::from(5)));
    }

    #[test]
    fn query_string_is_form_encoded() {
        let mut params = FlatParameters::new();
        params.insert("body", "hello world");
        params.insert("group_id", 7);
        assert_eq!(params.to_query_string(), "body=hello+world&group_id=7");
    }

    #[test]
    fn pairs_render_numbers_as_text() {
        let mut params = FlatParameters::new();
        params.insert("limit", 20);
        assert_eq!(params.pairs(), vec![("limit".to_string(), "20".to_string())]);
    }
}
