use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed type of a raw source value.
///
/// `Mixed` and `Null` only appear at the field level: `Mixed` when a field
/// held more than one value type across sampled records, `Null` when it
/// never held a non-empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Null,
    Mixed,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Null => "null",
            ValueType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
