//! Transform chain configuration.
//!
//! Each field mapping may carry an ordered list of [`TransformConfig`]
//! steps. The enum is tagged by `type` on the wire, so exactly one payload
//! shape exists per transform kind and the engine's dispatch is exhaustive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target/source kind for the `convert` transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertKind {
    String,
    Number,
    Boolean,
    Date,
    Json,
}

/// Operation for the `math` transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Round,
    Floor,
    Ceil,
    Abs,
}

/// A single value transformation step.
///
/// Transforms are pure value-to-value functions; `template`, `join`,
/// `concat`, `conditional`, and `custom` may additionally read other
/// fields of the record being mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformConfig {
    /// Interpolate `${...}` placeholders; `${value}` is the current value,
    /// any other name is a record path.
    Template { template: String },
    /// Join against a registered lookup table.
    Lookup {
        table: String,
        /// Join field in the table rows; defaults to the table's key field.
        #[serde(default)]
        from_field: Option<String>,
        /// Field projected from the matching row.
        to_field: String,
        #[serde(default)]
        default: Option<Value>,
    },
    /// Coerce between string, number, boolean, date, and JSON.
    Convert { from: ConvertKind, to: ConvertKind },
    /// Split a string into an array, optionally selecting one element.
    Split {
        separator: String,
        #[serde(default)]
        index: Option<usize>,
    },
    /// Join an array value, or a list of record fields, into one string.
    Join {
        separator: String,
        #[serde(default)]
        fields: Vec<String>,
    },
    /// Dictionary lookup by stringified value.
    Map {
        values: BTreeMap<String, Value>,
        #[serde(default)]
        case_insensitive: bool,
        #[serde(default)]
        default: Option<Value>,
    },
    /// Parse a date and optionally reformat it with `YYYY,MM,DD,HH,mm,ss`
    /// tokens.
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    Trim,
    Lowercase,
    Uppercase,
    /// Substring or regex replacement.
    Replace {
        pattern: String,
        replacement: String,
        #[serde(default)]
        regex: bool,
    },
    /// Apply a regex and return one capture group (default 1), or null on
    /// no match.
    Extract {
        pattern: String,
        #[serde(default)]
        group: Option<usize>,
    },
    /// Substitute a configured value for empty input.
    Default {
        value: Value,
        #[serde(default = "default_true")]
        only_if_empty: bool,
    },
    /// Concatenate the current value with other record fields.
    Concat {
        fields: Vec<String>,
        #[serde(default)]
        separator: String,
    },
    /// Arithmetic on numeric values with optional decimal precision.
    Math {
        operation: MathOp,
        #[serde(default)]
        operand: Option<f64>,
        #[serde(default)]
        precision: Option<u32>,
    },
    /// Evaluate a condition against the record and pick `then` or `else`.
    Conditional {
        condition: String,
        then: Value,
        #[serde(rename = "else")]
        otherwise: Value,
    },
    /// Delegate to the external sandboxed expression evaluator.
    Custom { expression: String },
}

fn default_true() -> bool {
    true
}

impl TransformConfig {
    /// The transform kind as it appears in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformConfig::Template { .. } => "template",
            TransformConfig::Lookup { .. } => "lookup",
            TransformConfig::Convert { .. } => "convert",
            TransformConfig::Split { .. } => "split",
            TransformConfig::Join { .. } => "join",
            TransformConfig::Map { .. } => "map",
            TransformConfig::Date { .. } => "date",
            TransformConfig::Trim => "trim",
            TransformConfig::Lowercase => "lowercase",
            TransformConfig::Uppercase => "uppercase",
            TransformConfig::Replace { .. } => "replace",
            TransformConfig::Extract { .. } => "extract",
            TransformConfig::Default { .. } => "default",
            TransformConfig::Concat { .. } => "concat",
            TransformConfig::Math { .. } => "math",
            TransformConfig::Conditional { .. } => "conditional",
            TransformConfig::Custom { .. } => "custom",
        }
    }
}
