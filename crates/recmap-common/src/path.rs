//! Nested-path access on JSON-shaped records.
//!
//! Paths are dot-separated; `tags[0]` is equivalent to `tags.0`. Reads
//! return `None` whenever a segment cannot be resolved; writes create
//! intermediate containers on demand, picking an array when the next
//! segment is purely numeric and an object otherwise.
//!
//! Segments named `__proto__`, `constructor`, or `prototype` are rejected
//! outright. The records handled here frequently round-trip through
//! JavaScript consumers, so those keys never enter mapped output.

use serde_json::{Map, Value};
use thiserror::Error;

const RESERVED_SEGMENTS: [&str; 3] = ["__proto__", "constructor", "prototype"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    EmptyPath,
    #[error("reserved path segment: {0}")]
    ReservedSegment(String),
}

/// Splits a dotted path into segments, expanding bracket indices.
///
/// `items[2].id` becomes `["items", "2", "id"]`.
fn split_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            continue;
        }
        let mut rest = part;
        while let Some(open) = rest.find('[') {
            let head = &rest[..open];
            if !head.is_empty() {
                segments.push(head.to_string());
            }
            match rest[open..].find(']') {
                Some(close) => {
                    segments.push(rest[open + 1..open + close].to_string());
                    rest = &rest[open + close + 1..];
                }
                None => {
                    // Unbalanced bracket: keep the remainder literal.
                    segments.push(rest[open..].to_string());
                    rest = "";
                }
            }
        }
        if !rest.is_empty() {
            segments.push(rest.to_string());
        }
    }
    segments
}

fn is_reserved(segment: &str) -> bool {
    RESERVED_SEGMENTS.contains(&segment)
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Reads the value at `path`, or `None` when any intermediate is missing,
/// not a container, an array indexed non-numerically, or the path touches
/// a reserved segment.
pub fn get_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = split_segments(path);
    if segments.is_empty() {
        return None;
    }
    let mut current = record;
    for segment in &segments {
        if is_reserved(segment) {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate objects/arrays as
/// needed. Arrays are padded with nulls up to the written index. An
/// existing non-container intermediate is replaced.
pub fn set_path(record: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments = split_segments(path);
    if segments.is_empty() {
        return Err(PathError::EmptyPath);
    }
    if let Some(reserved) = segments.iter().find(|segment| is_reserved(segment)) {
        return Err(PathError::ReservedSegment(reserved.clone()));
    }

    let mut current = record;
    for (pos, segment) in segments.iter().enumerate() {
        let last = pos + 1 == segments.len();
        let next_is_index = segments.get(pos + 1).is_some_and(|next| is_index(next));
        // Digit-only segments too large for usize fall back to object keys.
        let index = if is_index(segment) {
            segment.parse::<usize>().ok()
        } else {
            None
        };

        if let Some(index) = index {
            if !current.is_array() {
                *current = Value::Array(Vec::new());
            }
            if let Value::Array(items) = current {
                while items.len() <= index {
                    items.push(Value::Null);
                }
                if last {
                    items[index] = value;
                    return Ok(());
                }
                if !items[index].is_object() && !items[index].is_array() {
                    items[index] = empty_container(next_is_index);
                }
                current = &mut items[index];
            }
        } else {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            if let Value::Object(map) = current {
                if last {
                    map.insert(segment.clone(), value);
                    return Ok(());
                }
                let entry = map
                    .entry(segment.clone())
                    .or_insert_with(|| empty_container(next_is_index));
                if !entry.is_object() && !entry.is_array() {
                    *entry = empty_container(next_is_index);
                }
                current = entry;
            }
        }
    }
    Ok(())
}

fn empty_container(as_array: bool) -> Value {
    if as_array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn get_nested_object_path() {
        let record = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get_path(&record, "a.b.c"), Some(&json!(42)));
        assert_eq!(get_path(&record, "a.b.missing"), None);
        assert_eq!(get_path(&record, "a.b.c.deeper"), None);
    }

    #[test]
    fn bracket_and_dot_index_are_equivalent() {
        let record = json!({"tags": ["red", "blue"]});
        assert_eq!(get_path(&record, "tags[1]"), Some(&json!("blue")));
        assert_eq!(get_path(&record, "tags.1"), Some(&json!("blue")));
        assert_eq!(get_path(&record, "tags[oops]"), None);
    }

    #[test]
    fn set_creates_intermediate_containers() {
        let mut record = json!({});
        set_path(&mut record, "items[1].id", json!(7)).unwrap();
        assert_eq!(record, json!({"items": [null, {"id": 7}]}));
    }

    #[test]
    fn set_chooses_object_for_non_numeric_next_segment() {
        let mut record = json!({});
        set_path(&mut record, "meta.labels.en", json!("Widget")).unwrap();
        assert_eq!(record, json!({"meta": {"labels": {"en": "Widget"}}}));
    }

    #[test]
    fn reserved_segments_are_rejected() {
        let mut record = json!({});
        let err = set_path(&mut record, "__proto__.polluted", json!(true)).unwrap_err();
        assert_eq!(err, PathError::ReservedSegment("__proto__".to_string()));
        assert_eq!(record, json!({}));

        for path in ["constructor.x", "a.prototype.b"] {
            assert!(set_path(&mut record, path, json!(1)).is_err());
        }
        assert_eq!(get_path(&json!({"__proto__": 1}), "__proto__"), None);
    }

    proptest! {
        #[test]
        fn roundtrip_get_after_set(
            segments in proptest::collection::vec("[a-z][a-z0-9]{0,6}", 1..5),
            value in -1_000_000i64..1_000_000i64,
        ) {
            let path = segments.join(".");
            let mut record = json!({});
            set_path(&mut record, &path, json!(value)).unwrap();
            prop_assert_eq!(get_path(&record, &path), Some(&json!(value)));
        }
    }
}
