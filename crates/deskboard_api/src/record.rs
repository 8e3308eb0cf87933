use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ApiError;

/// Field names tried, in order, when looking for a record's identity
pub const ID_FIELDS: [&str; 2] = ["_id", "id"];

/// Anything a data grid can read cells and a row identity from
pub trait TableRecord {
    /// Text of the field named `key`, `None` when the record has no such field
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Stable identity of the record, if it carries one
    fn row_id(&self) -> Option<Cow<'_, str>>;
}

/// A record as served by the content API: a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an arbitrary JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => {
                Err(ApiError::UnexpectedShape("record is not a JSON object"))
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Builder-style insert, handy for seeding
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Identity of the record: `_id`, falling back to `id`
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.row_id().map(Cow::into_owned)
    }

    /// Name of the field carrying the identity, if any
    #[must_use]
    pub fn id_field(&self) -> Option<&'static str> {
        ID_FIELDS
            .into_iter()
            .find(|field| self.get(field).is_some_and(is_identity))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Overwrite fields with the ones present in `other`
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TableRecord for Record {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(value_text)
    }

    fn row_id(&self) -> Option<Cow<'_, str>> {
        self.id_field()
            .and_then(|field| self.get(field))
            .map(value_text)
    }
}

// Empty strings and nulls are treated as "no id", the same as a missing field.
fn is_identity(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            false
        }
    }
}

/// Display text of a JSON value as shown in a table cell
#[must_use]
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(value_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Cow::Owned(value.to_string()),
    }
}
