//! Textual and array forms of a pile.
//!
//! Textual form: `<count>:<item>` or `<count>:<item> <tags-json>`, where
//! `<count>` is a decimal integer or `Infinity` and the tags are a single-line
//! JSON object. Array form: `[item]`, `[item, count]` or `[item, count, tags]`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::config::PileConfig;
use crate::count::Count;
use crate::error::{PileError, json_kind};
use crate::pile::ItemPile;
use crate::tags::{self, Tags};

/// Either an already-built pile or its positional array form.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum PileInput {
    // Listed first so untagged decoding never reads an array as a struct.
    Array(Vec<Value>),
    Pile(ItemPile),
}

impl From<ItemPile> for PileInput {
    fn from(pile: ItemPile) -> Self {
        Self::Pile(pile)
    }
}

impl From<Vec<Value>> for PileInput {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(values)
    }
}

impl ItemPile {
    /// Parses the textual form. Equivalent to `text.parse::<ItemPile>()`.
    pub fn from_string(text: &str) -> Result<Self, PileError> {
        text.parse()
    }

    /// Builds a pile from `[item]`, `[item, count]` or `[item, count, tags]`.
    ///
    /// `null` entries take the constructor defaults.
    pub fn from_array(values: &[Value]) -> Result<Self, PileError> {
        let (item, count, tag_value) = match values {
            [] => return Err(PileError::EmptyArray),
            [item] => (item, None, None),
            [item, count] => (item, Some(count), None),
            [item, count, tag_value] => (item, Some(count), Some(tag_value)),
            _ => return Err(PileError::ArrayTooLong { len: values.len() }),
        };

        let item = match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => {
                return Err(PileError::InvalidArrayItem {
                    found: json_kind(other),
                });
            }
        };
        let count = count.map(count_from_value).transpose()?.flatten();
        let tags = tag_value
            .map(|t| tags::tags_from_value(t.clone()))
            .transpose()?;

        Ok(Self::from_parts(item, count, tags))
    }

    /// Passes a pile through untouched, or builds one from its array form.
    pub fn from_array_if_array(input: impl Into<PileInput>) -> Result<Self, PileError> {
        match input.into() {
            PileInput::Pile(pile) => Ok(pile),
            PileInput::Array(values) => Self::from_array(&values),
        }
    }

    /// Array form of this pile; tags are omitted when empty.
    pub fn to_array(&self) -> Vec<Value> {
        let count = match self.count {
            Count::Finite(n) => Value::from(n),
            Count::Infinite => Value::from(PileConfig::INFINITY_TOKEN),
        };
        let mut values = vec![Value::from(self.item.as_str()), count];
        if self.has_tags() {
            values.push(Value::Object(tags::deep_copy(&self.tags)));
        }
        values
    }
}

/// Reads an array-form count; `null` means "use the default".
fn count_from_value(value: &Value) -> Result<Option<Count>, PileError> {
    let invalid = || PileError::InvalidArrayCount {
        value: value.to_string(),
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                return Ok(Some(Count::Finite(n)));
            }
            // Integral floats such as `42.0` are still counts.
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
                    Ok(Some(Count::Finite(f as u64)))
                }
                _ => Err(invalid()),
            }
        }
        Value::String(token) if token == PileConfig::INFINITY_TOKEN => Ok(Some(Count::Infinite)),
        _ => Err(invalid()),
    }
}

impl fmt::Display for ItemPile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.count, PileConfig::COUNT_SEPARATOR, self.item)?;
        if self.has_tags() {
            let json = serde_json::to_string(&self.tags).map_err(|_| fmt::Error)?;
            write!(f, "{}{}", PileConfig::TAGS_SEPARATOR, json)?;
        }
        Ok(())
    }
}

impl FromStr for ItemPile {
    type Err = PileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = parse_text(s);
        if let Err(err) = &parsed {
            tracing::debug!(input = s, code = err.error_code(), "failed to parse pile");
        }
        parsed
    }
}

fn parse_text(s: &str) -> Result<ItemPile, PileError> {
    let (count, rest) =
        s.split_once(PileConfig::COUNT_SEPARATOR)
            .ok_or_else(|| PileError::MissingCountSeparator {
                input: s.to_string(),
            })?;
    let count: Count = count.parse()?;

    let (item, parsed_tags) = match rest.split_once(PileConfig::TAGS_SEPARATOR) {
        Some((item, json)) => (item, tags::parse_tags(json)?),
        None => (rest, Tags::new()),
    };

    Ok(ItemPile::new(item, count).with_tags(parsed_tags))
}
