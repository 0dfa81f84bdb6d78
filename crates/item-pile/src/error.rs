//! Error infrastructure for item piles.
//!
//! Expected domain outcomes are not errors: a rejected split is `None` and
//! overflow is a returned excess. [`PileError`] covers malformed external
//! input only (textual form, array form, split requests built from raw numbers).

/// Errors produced while decoding piles or split requests from external input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PileError {
    /// Textual form has no `:` between count and item.
    #[error("missing ':' count separator in {input:?}")]
    MissingCountSeparator {
        /// The rejected input.
        input: String,
    },

    /// Count token is neither a non-negative integer nor `Infinity`.
    #[error("invalid count {token:?}")]
    InvalidCount {
        /// The rejected token.
        token: String,
    },

    /// Tags suffix is not valid JSON.
    #[error("invalid tags JSON: {reason}")]
    InvalidTags {
        /// Parser diagnostic.
        reason: String,
    },

    /// Tags parsed, but as something other than a JSON object.
    #[error("tags must be a JSON object, got {found}")]
    TagsNotObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// Array form with no elements.
    #[error("pile array is empty")]
    EmptyArray,

    /// Array form with more than `[item, count, tags]`.
    #[error("pile array has {len} elements (max: 3)")]
    ArrayTooLong {
        /// Actual array length.
        len: usize,
    },

    /// First array element is not a string or null.
    #[error("pile array item must be a string, got {found}")]
    InvalidArrayItem {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// Second array element is not a usable count.
    #[error("pile array count must be a non-negative integer or \"Infinity\", got {value}")]
    InvalidArrayCount {
        /// Compact JSON rendering of the rejected value.
        value: String,
    },

    /// Raw number cannot be classified as a split request.
    #[error("invalid split amount {amount}")]
    InvalidSplitAmount {
        /// The rejected amount.
        amount: f64,
    },
}

impl PileError {
    /// Returns a stable identifier for this error variant.
    pub fn error_code(&self) -> &'static str {
        use PileError::*;
        match self {
            MissingCountSeparator { .. } => "PILE_MISSING_COUNT_SEPARATOR",
            InvalidCount { .. } => "PILE_INVALID_COUNT",
            InvalidTags { .. } => "PILE_INVALID_TAGS",
            TagsNotObject { .. } => "PILE_TAGS_NOT_OBJECT",
            EmptyArray => "PILE_EMPTY_ARRAY",
            ArrayTooLong { .. } => "PILE_ARRAY_TOO_LONG",
            InvalidArrayItem { .. } => "PILE_INVALID_ARRAY_ITEM",
            InvalidArrayCount { .. } => "PILE_INVALID_ARRAY_COUNT",
            InvalidSplitAmount { .. } => "PILE_INVALID_SPLIT_AMOUNT",
        }
    }
}

/// Returns the JSON kind name of a value, for diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
