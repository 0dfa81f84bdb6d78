//! Per-pile tag data.
//!
//! Tags are an opaque JSON object distinguishing otherwise identical piles
//! (durability, enchantments, ...). Two contracts matter to the pile:
//!
//! - **Ownership**: every pile owns its tags outright. [`deep_copy`] is the
//!   single copy point, so a cloned or split-off pile shares nothing with its source.
//! - **Equality**: [`deep_equal`] compares structure, not representation, so
//!   `1` and `1.0` are the same tag value.

use serde_json::{Map, Number, Value};

use crate::error::{PileError, json_kind};

/// Tag mapping carried by a pile. Key order is preserved.
pub type Tags = Map<String, Value>;

/// Copies a tag mapping for a new owner.
///
/// Owned `serde_json::Value` clones are deep, so the copy shares nothing with
/// `tags`.
pub fn deep_copy(tags: &Tags) -> Tags {
    tags.clone()
}

/// Structural equality of two tag mappings. Key order is ignored.
pub fn deep_equal(a: &Tags, b: &Tags) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| value_equal(value, other)))
}

fn value_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => number_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| value_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => deep_equal(x, y),
        _ => false,
    }
}

fn number_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Parses the JSON tags suffix of the textual pile form.
pub fn parse_tags(json: &str) -> Result<Tags, PileError> {
    let value: Value = serde_json::from_str(json).map_err(|e| PileError::InvalidTags {
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PileError::TagsNotObject {
            found: json_kind(&other),
        }),
    }
}

/// Accepts an array-form tags element; `null` reads as no tags.
pub(crate) fn tags_from_value(value: Value) -> Result<Tags, PileError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Tags::new()),
        other => Err(PileError::TagsNotObject {
            found: json_kind(&other),
        }),
    }
}
