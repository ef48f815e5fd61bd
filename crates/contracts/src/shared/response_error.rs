//! Validation error payload returned by the API on a failed mutation.
//!
//! The body is a nested mix of objects (one entry per field), arrays (one
//! slot per collection item) and leaves (a message or a list of messages).
//! Shape is classified once, when the JSON is converted into
//! [`ResponseError`], in the order object, leaf, array. Anything that fits
//! none of them is dropped with a warning.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Form-level messages, surfaced to the user
pub const NON_FIELD_ERRORS: &str = "non_field_errors";
/// Form-level messages meant for diagnostics only, never surfaced
pub const INTERNAL_NON_FIELD_ERRORS: &str = "internal_non_field_errors";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("array mixes messages with nested errors")]
    MixedArray,
    #[error("unexpected {0} where an error was expected")]
    Unexpected(&'static str),
}

// ============================================================================
// Node types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LeafError {
    Message(String),
    Messages(Vec<String>),
}

impl LeafError {
    /// Single display string; message lists are joined with a space
    pub fn joined(&self) -> String {
        match self {
            LeafError::Message(message) => message.clone(),
            LeafError::Messages(messages) => messages.join(" "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectError {
    pub non_field_errors: Option<LeafError>,
    pub internal_non_field_errors: Option<LeafError>,
    pub fields: BTreeMap<String, ResponseError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseError {
    Leaf(LeafError),
    Object(ObjectError),
    Array(Vec<ResponseError>),
}

// ============================================================================
// Classification
// ============================================================================

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn leaf_from_value(value: &Value) -> Option<LeafError> {
    match value {
        Value::String(message) => Some(LeafError::Message(message.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(LeafError::Messages),
        _ => None,
    }
}

impl ObjectError {
    /// Converts the root of an error body. Fields that cannot be classified
    /// are dropped with a warning rather than failing the whole body.
    pub fn from_value(value: &Value) -> Result<Self, ClassifyError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map, "")),
            other => Err(ClassifyError::Unexpected(kind_name(other))),
        }
    }

    fn from_map(map: &Map<String, Value>, path: &str) -> Self {
        let mut error = ObjectError::default();
        for (key, value) in map {
            let field_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };

            if key == NON_FIELD_ERRORS || key == INTERNAL_NON_FIELD_ERRORS {
                let Some(leaf) = leaf_from_value(value) else {
                    log::warn!(
                        "dropping malformed `{}`: expected messages, got {}",
                        field_path,
                        kind_name(value)
                    );
                    continue;
                };
                if key == NON_FIELD_ERRORS {
                    error.non_field_errors = Some(leaf);
                } else {
                    error.internal_non_field_errors = Some(leaf);
                }
                continue;
            }

            match ResponseError::classify(value, &field_path) {
                Ok(node) => {
                    error.fields.insert(key.clone(), node);
                }
                Err(e) => {
                    log::warn!("dropping unclassifiable error at `{}`: {}", field_path, e);
                }
            }
        }
        error
    }

    pub fn is_empty(&self) -> bool {
        self.non_field_errors.is_none()
            && self.internal_non_field_errors.is_none()
            && self.fields.is_empty()
    }
}

impl ResponseError {
    fn classify(value: &Value, path: &str) -> Result<Self, ClassifyError> {
        if let Value::Object(map) = value {
            return Ok(ResponseError::Object(ObjectError::from_map(map, path)));
        }
        if let Some(leaf) = leaf_from_value(value) {
            return Ok(ResponseError::Leaf(leaf));
        }
        let Value::Array(items) = value else {
            return Err(ClassifyError::Unexpected(kind_name(value)));
        };

        let mut nodes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, index);
            // An all-string array is a leaf, so a bare string here sits next
            // to nested errors
            let node = match item {
                Value::Object(_) | Value::Array(_) => Self::classify(item, &item_path)?,
                Value::String(_) => return Err(ClassifyError::MixedArray),
                other => return Err(ClassifyError::Unexpected(kind_name(other))),
            };
            nodes.push(node);
        }
        Ok(ResponseError::Array(nodes))
    }
}

impl TryFrom<&Value> for ResponseError {
    type Error = ClassifyError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::classify(value, "")
    }
}

// ============================================================================
// Serde
// ============================================================================

impl<'de> Deserialize<'de> for ObjectError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ObjectError::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ResponseError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ResponseError::try_from(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ObjectError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len()
            + usize::from(self.non_field_errors.is_some())
            + usize::from(self.internal_non_field_errors.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(leaf) = &self.non_field_errors {
            map.serialize_entry(NON_FIELD_ERRORS, leaf)?;
        }
        if let Some(leaf) = &self.internal_non_field_errors {
            map.serialize_entry(INTERNAL_NON_FIELD_ERRORS, leaf)?;
        }
        for (key, node) in &self.fields {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}
