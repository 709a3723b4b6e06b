//! Condition expressions for the `conditional` transform.
//!
//! Grammar: `path [op literal]` where `op` is one of `==`, `!=`, `>=`,
//! `<=`, `>`, `<`. A bare path tests truthiness. Literals are
//! single- or double-quoted strings, numbers, `true`, `false`, or `null`.

use serde_json::Value;

use crate::error::TransformError;
use recmap_common::{get_path, is_empty_value, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

// Two-character operators listed before their one-character prefixes.
const OPS: &[(&str, Op)] = &[
    ("==", Op::Eq),
    ("!=", Op::Ne),
    (">=", Op::Ge),
    ("<=", Op::Le),
    (">", Op::Gt),
    ("<", Op::Lt),
];

/// Evaluates a condition expression against `record`.
pub fn eval_condition(expression: &str, record: &Value) -> Result<bool, TransformError> {
    let expr = expression.trim();
    if expr.is_empty() {
        return Err(TransformError::InvalidCondition(
            "empty expression".to_string(),
        ));
    }

    if let Some((pos, token, op)) = find_operator(expr) {
        let path = expr[..pos].trim();
        let literal = expr[pos + token.len()..].trim();
        if path.is_empty() || literal.is_empty() {
            return Err(TransformError::InvalidCondition(format!(
                "expected `path {token} literal` in '{expr}'"
            )));
        }
        let left = get_path(record, path).cloned().unwrap_or(Value::Null);
        let right = parse_literal(literal)?;
        return Ok(compare(&left, &right, op));
    }

    // Bare path: truthiness of the referenced value.
    let value = get_path(record, expr).cloned().unwrap_or(Value::Null);
    Ok(is_truthy(&value))
}

/// Locates the leftmost operator outside quoted literals, so an operator
/// substring inside a quoted string never splits the expression.
fn find_operator(expr: &str) -> Option<(usize, &'static str, Op)> {
    let bytes = expr.as_bytes();
    let mut quote: Option<u8> = None;
    for i in 0..bytes.len() {
        match quote {
            Some(q) => {
                if bytes[i] == q {
                    quote = None;
                }
            }
            None => {
                if bytes[i] == b'\'' || bytes[i] == b'"' {
                    quote = Some(bytes[i]);
                    continue;
                }
                for (token, op) in OPS {
                    if expr[i..].starts_with(token) {
                        return Some((i, token, *op));
                    }
                }
            }
        }
    }
    None
}

fn parse_literal(literal: &str) -> Result<Value, TransformError> {
    if (literal.starts_with('\'') && literal.ends_with('\'') && literal.len() >= 2)
        || (literal.starts_with('"') && literal.ends_with('"') && literal.len() >= 2)
    {
        return Ok(Value::String(literal[1..literal.len() - 1].to_string()));
    }
    match literal {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }
    if let Some(number) = parse_number(literal) {
        if let Some(n) = serde_json::Number::from_f64(number) {
            return Ok(Value::Number(n));
        }
    }
    Err(TransformError::InvalidCondition(format!(
        "unrecognized literal '{literal}'"
    )))
}

fn compare(left: &Value, right: &Value, op: Op) -> bool {
    match op {
        Op::Eq => loose_eq(left, right),
        Op::Ne => !loose_eq(left, right),
        Op::Ge | Op::Le | Op::Gt | Op::Lt => match (as_number(left), as_number(right)) {
            (Some(a), Some(b)) => match op {
                Op::Ge => a >= b,
                Op::Le => a <= b,
                Op::Gt => a > b,
                Op::Lt => a < b,
                _ => unreachable!(),
            },
            _ => false,
        },
    }
}

/// Equality that tolerates the usual string/number mismatch between
/// record data and literals.
fn loose_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (as_number(left), as_number(right)) {
        (Some(a), Some(b)) => a == b,
        _ => match (left, right) {
            (Value::String(a), Value::Bool(b)) | (Value::Bool(b), Value::String(a)) => {
                a == if *b { "true" } else { "false" }
            }
            _ => false,
        },
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => !is_empty_value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_and_inequality() {
        let record = json!({"status": "active", "qty": 3});
        assert!(eval_condition("status == 'active'", &record).unwrap());
        assert!(!eval_condition("status != 'active'", &record).unwrap());
        assert!(eval_condition("qty == 3", &record).unwrap());
        assert!(eval_condition("missing == null", &record).unwrap());
    }

    #[test]
    fn numeric_ordering() {
        let record = json!({"qty": "10", "price": 2.5});
        assert!(eval_condition("qty >= 10", &record).unwrap());
        assert!(eval_condition("qty > 9", &record).unwrap());
        assert!(!eval_condition("price > 3", &record).unwrap());
        assert!(eval_condition("price < 3", &record).unwrap());
    }

    #[test]
    fn bare_path_truthiness() {
        let record = json!({"active": true, "name": "x", "empty": "", "zero": 0});
        assert!(eval_condition("active", &record).unwrap());
        assert!(eval_condition("name", &record).unwrap());
        assert!(!eval_condition("empty", &record).unwrap());
        assert!(!eval_condition("zero", &record).unwrap());
        assert!(!eval_condition("missing", &record).unwrap());
    }

    #[test]
    fn operators_inside_quoted_literals_do_not_split() {
        let record = json!({"status": "a==b", "note": "x>y"});
        assert!(eval_condition("status == 'a==b'", &record).unwrap());
        assert!(!eval_condition("status != 'a==b'", &record).unwrap());
        assert!(eval_condition("note == \"x>y\"", &record).unwrap());
    }

    #[test]
    fn malformed_expressions() {
        let record = json!({});
        assert!(eval_condition("", &record).is_err());
        assert!(eval_condition("a == ", &record).is_err());
        assert!(eval_condition("a == what", &record).is_err());
    }
}
