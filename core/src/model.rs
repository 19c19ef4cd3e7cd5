//! Parsed response bodies.
//!
//! # Design
//! The API returns loosely-structured JSON. [`Model`] wraps a
//! `serde_json::Value` and offers typed accessors that fail with
//! [`Error::MissingField`] or [`Error::UnexpectedType`] instead of returning
//! defaults. Callers with a concrete schema can `deserialize` into their own
//! types.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::value::{Identifiable, Value};

/// A JSON response value.
#[derive(Debug, Clone, PartialEq)]
pub struct Model(serde_json::Value);

impl Model {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Member `key` of an object.
    pub fn get(&self, key: &str) -> Result<Model> {
        self.try_get(key)
            .ok_or_else(|| Error::MissingField(key.to_string()))
    }

    /// Member `key` of an object, or `None` when absent or `null`.
    pub fn try_get(&self, key: &str) -> Option<Model> {
        match self.0.get(key) {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(Model(value.clone())),
        }
    }

    /// Walk nested object members, e.g. `["access_token", "token"]`.
    pub fn get_path(&self, path: &[&str]) -> Result<Model> {
        path.iter().try_fold(self.clone(), |model, key| model.get(key))
    }

    pub fn as_str(&self) -> Result<&str> {
        self.0.as_str().ok_or(Error::UnexpectedType { expected: "string" })
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.0.as_i64().ok_or(Error::UnexpectedType { expected: "integer" })
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.0.as_bool().ok_or(Error::UnexpectedType { expected: "boolean" })
    }

    pub fn as_array(&self) -> Result<Vec<Model>> {
        self.0
            .as_array()
            .map(|items| items.iter().cloned().map(Model).collect())
            .ok_or(Error::UnexpectedType { expected: "array" })
    }

    /// Length of an array or number of members of an object.
    pub fn len(&self) -> Result<usize> {
        match &self.0 {
            serde_json::Value::Array(items) => Ok(items.len()),
            serde_json::Value::Object(map) => Ok(map.len()),
            _ => Err(Error::UnexpectedType {
                expected: "array or object",
            }),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.0.clone())?)
    }
}

impl Identifiable for Model {
    fn id(&self) -> Option<Value> {
        match self.0.get("id")? {
            serde_json::Value::Number(n) => Some(Value::Number(n.clone())),
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            _ => None,
        }
    }
}

/// Passing a model where an identifier is expected uses its `id`.
impl From<&Model> for Value {
    fn from(model: &Model) -> Self {
        Value::object(model.clone())
    }
}

impl From<Model> for Value {
    fn from(model: Model) -> Self {
        Value::object(model)
    }
}

/// Outcome of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The body was parsed as JSON.
    Model(Model),
    /// 2xx with a blank body.
    Success,
}

impl Response {
    pub fn has_body(&self) -> bool {
        matches!(self, Response::Model(_))
    }

    /// The parsed body; a blank body is an unexpected format.
    pub fn into_model(self) -> Result<Model> {
        match self {
            Response::Model(model) => Ok(model),
            Response::Success => Err(Error::UnexpectedResponseFormat),
        }
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Response::Model(model) => Some(model),
            Response::Success => None,
        }
    }
}
