use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{InferredSchema, Row};

/// Field name used to wrap array elements that are not objects, so scalars
/// and nested arrays still get a column in the table view.
pub const VALUE_FIELD: &str = "value";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
  #[error("top-level JSON value is not an array")]
  NotAnArray,
  #[error("array is empty")]
  EmptyArray,
}

/// Derive a uniform tabular schema from an arbitrary JSON value.
///
/// The value must be a non-empty array. Object elements contribute their
/// keys to the field union and become one row each; non-object elements are
/// wrapped as `{"value": <element>}`. Fields come out sorted
/// lexicographically and rows keep input order with `original_index` set to
/// the source position, so repeated runs over the same value are
/// reproducible and no element is dropped or reordered.
pub fn infer(value: &Value) -> Result<InferredSchema, SchemaError> {
  let items = match value {
    Value::Array(items) => items,
    _ => return Err(SchemaError::NotAnArray),
  };
  if items.is_empty() {
    return Err(SchemaError::EmptyArray);
  }

  let mut field_set: BTreeSet<String> = BTreeSet::new();
  let mut rows = Vec::with_capacity(items.len());

  for (i, item) in items.iter().enumerate() {
    let cells = match item {
      Value::Object(obj) => {
        for key in obj.keys() {
          if !field_set.contains(key) {
            field_set.insert(key.clone());
          }
        }
        obj.clone()
      }
      other => {
        field_set.insert(VALUE_FIELD.to_string());
        let mut cells = Map::new();
        cells.insert(VALUE_FIELD.to_string(), other.clone());
        cells
      }
    };
    rows.push(Row {
      original_index: i as u64,
      cells,
    });
  }

  Ok(InferredSchema {
    fields: field_set.into_iter().collect(),
    rows,
  })
}

/// Initial visible-field selection: the first `min(max, |fields|)` fields in
/// sorted order. A policy default to keep fresh tables readable; callers may
/// select any subset afterwards.
pub fn default_visible_fields(fields: &[String], max: usize) -> Vec<String> {
  fields.iter().take(max).cloned().collect()
}
