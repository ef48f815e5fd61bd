use std::collections::BTreeMap;

use contracts::shared::response_error::{LeafError, ObjectError, ResponseError};
use serde_json::Value;

use super::path::{display_path, FieldKey, PathSegment};

/// Error tree consumed by forms: one message per field, nested maps for
/// nested objects and for rows of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Message(String),
    Fields(FormErrorMap),
}

impl FormError {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            FormError::Message(message) => Some(message),
            FormError::Fields(_) => None,
        }
    }

    pub fn as_fields(&self) -> Option<&FormErrorMap> {
        match self {
            FormError::Fields(map) => Some(map),
            FormError::Message(_) => None,
        }
    }
}

/// One level of the tree. `non_field_error` is the form-level (or
/// row-level) message of that level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrorMap {
    pub non_field_error: Option<String>,
    pub fields: BTreeMap<FieldKey, FormError>,
}

impl FormErrorMap {
    pub fn is_empty(&self) -> bool {
        self.non_field_error.is_none() && self.fields.is_empty()
    }

    pub fn get(&self, key: impl Into<FieldKey>) -> Option<&FormError> {
        self.fields.get(&key.into())
    }

    /// Message of a leaf field
    pub fn message(&self, key: impl Into<FieldKey>) -> Option<&str> {
        self.get(key).and_then(FormError::as_message)
    }

    pub fn nested(&self, key: impl Into<FieldKey>) -> Option<&FormErrorMap> {
        self.get(key).and_then(FormError::as_fields)
    }

    /// Message at the end of `path`, e.g. `[planned_interventions, <client id>, title]`
    pub fn message_at(&self, path: &[FieldKey]) -> Option<&str> {
        let (last, parents) = path.split_last()?;
        let mut level = self;
        for key in parents {
            level = level.fields.get(key)?.as_fields()?;
        }
        level.fields.get(last)?.as_message()
    }
}

/// Normalizes an object node and everything below it.
///
/// `get_key` receives the full location of each array item, index last, and
/// names the key the item's errors go under; items it cannot name are left
/// out. `non_field_errors` become `non_field_error` of the level;
/// `internal_non_field_errors` are never carried over.
pub fn transform_object_error(
    error: Option<&ObjectError>,
    get_key: &dyn Fn(&[PathSegment]) -> Option<FieldKey>,
    location: &[PathSegment],
) -> Option<FormErrorMap> {
    let error = error?;
    let mut map = FormErrorMap {
        non_field_error: error.non_field_errors.as_ref().map(LeafError::joined),
        fields: BTreeMap::new(),
    };

    let mut path = location.to_vec();
    for (name, node) in &error.fields {
        path.push(PathSegment::Key(name.clone()));
        if let Some(transformed) = transform_node(node, get_key, &path) {
            map.fields.insert(FieldKey::Name(name.clone()), transformed);
        }
        path.pop();
    }
    Some(map)
}

/// Normalizes the items of an array node into a map keyed by `get_key`
pub fn transform_array_error(
    items: &[ResponseError],
    get_key: &dyn Fn(&[PathSegment]) -> Option<FieldKey>,
    location: &[PathSegment],
) -> FormErrorMap {
    let mut map = FormErrorMap::default();
    let mut path = location.to_vec();
    for (index, item) in items.iter().enumerate() {
        path.push(PathSegment::Index(index));
        match get_key(&path).filter(|key| !key.is_empty()) {
            Some(key) => {
                if let Some(transformed) = transform_node(item, get_key, &path) {
                    map.fields.insert(key, transformed);
                }
            }
            None => log::debug!("no field for errors at `{}`", display_path(&path)),
        }
        path.pop();
    }
    map
}

fn transform_node(
    node: &ResponseError,
    get_key: &dyn Fn(&[PathSegment]) -> Option<FieldKey>,
    location: &[PathSegment],
) -> Option<FormError> {
    match node {
        ResponseError::Leaf(leaf) => Some(FormError::Message(leaf.joined())),
        ResponseError::Object(object) => {
            transform_object_error(Some(object), get_key, location).map(FormError::Fields)
        }
        ResponseError::Array(items) => Some(FormError::Fields(transform_array_error(
            items, get_key, location,
        ))),
    }
}

/// Normalizes a raw JSON error body.
///
/// A body that is only a message, or a list of messages, becomes the
/// form-level message. Any other non-object body yields `None`.
pub fn transform_response_body(
    body: &Value,
    get_key: &dyn Fn(&[PathSegment]) -> Option<FieldKey>,
) -> Option<FormErrorMap> {
    match ObjectError::from_value(body) {
        Ok(error) => transform_object_error(Some(&error), get_key, &[]),
        Err(e) => match ResponseError::try_from(body) {
            Ok(ResponseError::Leaf(leaf)) => Some(FormErrorMap {
                non_field_error: Some(leaf.joined()),
                fields: BTreeMap::new(),
            }),
            _ => {
                log::warn!("unexpected error body: {}", e);
                None
            }
        },
    }
}
