//! Pure per-kind transform functions.
//!
//! [`apply_transform`] dispatches a [`TransformConfig`] over an input value.
//! Every function is value-to-value; the record in [`TransformContext`] is
//! consulted only for cross-field references (`template`, `join`, `concat`,
//! `conditional`, `custom`) and for the lookup-table registry.

use regex::Regex;
use serde_json::Value;

use recmap_common::{get_path, is_empty_value};
use recmap_model::{ConvertKind, MathOp, TransformConfig};

use crate::condition::eval_condition;
use crate::context::TransformContext;
use crate::datetime::{format_tokens, parse_flexible};
use crate::error::TransformError;

/// Applies one transform step to `value`.
pub fn apply_transform(
    value: &Value,
    config: &TransformConfig,
    ctx: &TransformContext<'_>,
) -> Result<Value, TransformError> {
    match config {
        TransformConfig::Template { template } => Ok(render_template(template, value, ctx.record)),
        TransformConfig::Lookup {
            table,
            from_field,
            to_field,
            default,
        } => Ok(lookup(value, table, from_field.as_deref(), to_field, default, ctx)),
        TransformConfig::Convert { from: _, to } => convert(value, *to),
        TransformConfig::Split { separator, index } => Ok(split(value, separator, *index)),
        TransformConfig::Join { separator, fields } => Ok(join(value, separator, fields, ctx.record)),
        TransformConfig::Map {
            values,
            case_insensitive,
            default,
        } => Ok(map_value(value, values, *case_insensitive, default)),
        TransformConfig::Date { format } => Ok(reformat_date(value, format.as_deref())),
        TransformConfig::Trim => Ok(on_string(value, |s| s.trim().to_string())),
        TransformConfig::Lowercase => Ok(on_string(value, |s| s.to_lowercase())),
        TransformConfig::Uppercase => Ok(on_string(value, |s| s.to_uppercase())),
        TransformConfig::Replace {
            pattern,
            replacement,
            regex,
        } => replace(value, pattern, replacement, *regex),
        TransformConfig::Extract { pattern, group } => extract(value, pattern, *group),
        TransformConfig::Default {
            value: fallback,
            only_if_empty,
        } => {
            if !only_if_empty || is_empty_value(value) {
                Ok(fallback.clone())
            } else {
                Ok(value.clone())
            }
        }
        TransformConfig::Concat { fields, separator } => Ok(concat(value, fields, separator, ctx.record)),
        TransformConfig::Math {
            operation,
            operand,
            precision,
        } => math(value, *operation, *operand, *precision),
        TransformConfig::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if eval_condition(condition, ctx.record)? {
                Ok(then.clone())
            } else {
                Ok(otherwise.clone())
            }
        }
        TransformConfig::Custom { expression } => match ctx.evaluator {
            Some(evaluator) => evaluator.evaluate(expression, ctx.record),
            None => Err(TransformError::NoEvaluator),
        },
    }
}

/// Renders a value as the string a user would expect to see in mapped
/// output. Null becomes the empty string; structured values render as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Numeric coercion matching common source data: strips currency symbols,
/// separators, and units, keeping `[0-9.-]`, then parses the longest
/// numeric prefix.
pub fn coerce_number(value: &Value) -> Result<f64, TransformError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(TransformError::NonFiniteResult),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            parse_numeric_prefix(&cleaned).ok_or_else(|| TransformError::NumberParse {
                value: s.clone(),
            })
        }
        other => Err(TransformError::NumberParse {
            value: stringify(other),
        }),
    }
}

/// Longest valid numeric prefix of `input`, in the manner of `parseFloat`:
/// `"12.5.3"` parses as 12.5, `"-3-"` as -3.
fn parse_numeric_prefix(input: &str) -> Option<f64> {
    let bytes = input.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'-' if i == 0 => {}
            b'.' if !seen_dot => seen_dot = true,
            b'0'..=b'9' => seen_digit = true,
            _ => break,
        }
        end = i + 1;
    }
    if !seen_digit {
        return None;
    }
    input[..end].trim_end_matches('.').parse::<f64>().ok()
}

fn number_value(n: f64) -> Result<Value, TransformError> {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or(TransformError::NonFiniteResult)
}

const TRUTHY_TOKENS: &[&str] = &["true", "yes", "y", "1", "on"];

fn convert(value: &Value, to: ConvertKind) -> Result<Value, TransformError> {
    match to {
        ConvertKind::String => Ok(Value::String(stringify(value))),
        ConvertKind::Number => coerce_number(value).and_then(number_value),
        ConvertKind::Boolean => Ok(Value::Bool(match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            other => {
                let text = stringify(other).trim().to_lowercase();
                TRUTHY_TOKENS.contains(&text.as_str())
            }
        })),
        ConvertKind::Date => Ok(match parse_flexible(&stringify(value)) {
            Some(parsed) => Value::String(parsed.to_iso8601()),
            None => Value::Null,
        }),
        ConvertKind::Json => match value {
            Value::String(s) => {
                serde_json::from_str(s).map_err(|e| TransformError::JsonParse(e.to_string()))
            }
            other => Ok(other.clone()),
        },
    }
}

fn render_template(template: &str, value: &Value, record: &Value) -> Value {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => {
                let name = &rest[start + 2..start + 2 + end];
                if name == "value" {
                    out.push_str(&stringify(value));
                } else {
                    let field = get_path(record, name).cloned().unwrap_or(Value::Null);
                    out.push_str(&stringify(&field));
                }
                rest = &rest[start + 2 + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Value::String(out)
}

fn lookup(
    value: &Value,
    table_name: &str,
    from_field: Option<&str>,
    to_field: &str,
    default: &Option<Value>,
    ctx: &TransformContext<'_>,
) -> Value {
    let Some(table) = ctx.tables.get(table_name) else {
        tracing::warn!(table = table_name, "lookup against unregistered table");
        return default.clone().unwrap_or_else(|| value.clone());
    };
    let join_field = from_field.unwrap_or(&table.key_field);
    let needle = stringify(value);
    for row in &table.data {
        if let Some(candidate) = row.get(join_field)
            && stringify(candidate) == needle
        {
            return row.get(to_field).cloned().unwrap_or(Value::Null);
        }
    }
    default.clone().unwrap_or_else(|| value.clone())
}

fn split(value: &Value, separator: &str, index: Option<usize>) -> Value {
    let text = stringify(value);
    let parts: Vec<Value> = text
        .split(separator)
        .map(|p| Value::String(p.to_string()))
        .collect();
    match index {
        Some(i) => parts.get(i).cloned().unwrap_or(Value::Null),
        None => Value::Array(parts),
    }
}

fn join(value: &Value, separator: &str, fields: &[String], record: &Value) -> Value {
    let parts: Vec<String> = if fields.is_empty() {
        match value {
            Value::Array(items) => items.iter().map(stringify).collect(),
            other => vec![stringify(other)],
        }
    } else {
        fields
            .iter()
            .filter_map(|f| get_path(record, f))
            .filter(|v| !is_empty_value(v))
            .map(stringify)
            .collect()
    };
    Value::String(parts.join(separator))
}

fn map_value(
    value: &Value,
    values: &std::collections::BTreeMap<String, Value>,
    case_insensitive: bool,
    default: &Option<Value>,
) -> Value {
    let key = stringify(value);
    if let Some(mapped) = values.get(&key) {
        return mapped.clone();
    }
    if case_insensitive {
        let folded = key.to_lowercase();
        for (k, v) in values {
            if k.to_lowercase() == folded {
                return v.clone();
            }
        }
    }
    default.clone().unwrap_or_else(|| value.clone())
}

fn reformat_date(value: &Value, format: Option<&str>) -> Value {
    match parse_flexible(&stringify(value)) {
        Some(parsed) => Value::String(match format {
            Some(format) => format_tokens(&parsed.datetime, format),
            None => parsed.to_iso8601(),
        }),
        None => Value::Null,
    }
}

/// String operations are the identity on non-string values.
fn on_string(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}

fn replace(
    value: &Value,
    pattern: &str,
    replacement: &str,
    use_regex: bool,
) -> Result<Value, TransformError> {
    let Value::String(s) = value else {
        return Ok(value.clone());
    };
    if use_regex {
        let re = Regex::new(pattern).map_err(|e| TransformError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Value::String(re.replace_all(s, replacement).into_owned()))
    } else {
        Ok(Value::String(s.replace(pattern, replacement)))
    }
}

fn extract(value: &Value, pattern: &str, group: Option<usize>) -> Result<Value, TransformError> {
    let text = stringify(value);
    let re = Regex::new(pattern).map_err(|e| TransformError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let group = group.unwrap_or(1);
    Ok(match re.captures(&text) {
        Some(caps) => caps
            .get(group)
            .map(|m| Value::String(m.as_str().to_string()))
            .unwrap_or(Value::Null),
        None => Value::Null,
    })
}

fn concat(value: &Value, fields: &[String], separator: &str, record: &Value) -> Value {
    let mut parts = vec![stringify(value)];
    parts.extend(
        fields
            .iter()
            .filter_map(|f| get_path(record, f))
            .filter(|v| !is_empty_value(v))
            .map(stringify),
    );
    Value::String(parts.join(separator))
}

fn math(
    value: &Value,
    operation: MathOp,
    operand: Option<f64>,
    precision: Option<u32>,
) -> Result<Value, TransformError> {
    let input = coerce_number(value)?;
    let binary = |name| operand.ok_or(TransformError::MissingOperand { operation: name });
    let result = match operation {
        MathOp::Add => input + binary("add")?,
        MathOp::Subtract => input - binary("subtract")?,
        MathOp::Multiply => input * binary("multiply")?,
        MathOp::Divide => {
            let divisor = binary("divide")?;
            if divisor == 0.0 {
                return Err(TransformError::DivisionByZero);
            }
            input / divisor
        }
        MathOp::Round => input.round(),
        MathOp::Floor => input.floor(),
        MathOp::Ceil => input.ceil(),
        MathOp::Abs => input.abs(),
    };
    let result = match precision {
        Some(p) => {
            let scale = 10f64.powi(p as i32);
            (result * scale).round() / scale
        }
        None => result,
    };
    if !result.is_finite() {
        return Err(TransformError::NonFiniteResult);
    }
    number_value(result)
}
