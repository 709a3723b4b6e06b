//! Type-compatibility and description scoring.

use std::collections::BTreeSet;

use recmap_model::{FieldType, ValueType};

/// Neutral score used when a component cannot discriminate (type inference
/// off, mixed/null source types, missing descriptions).
pub const NEUTRAL_SCORE: u8 = 50;

const COMPATIBLE_SCORE: u8 = 100;
const INCOMPATIBLE_SCORE: u8 = 20;

/// Scores how well a detected source type fits a target field type.
///
/// `Mixed` and `Null` source types always concede the neutral score; they
/// carry no usable signal.
pub fn type_score(source: ValueType, target: FieldType, inference_enabled: bool) -> u8 {
    if !inference_enabled {
        return NEUTRAL_SCORE;
    }
    match source {
        ValueType::Mixed | ValueType::Null => NEUTRAL_SCORE,
        _ if compatible(source, target) => COMPATIBLE_SCORE,
        _ => INCOMPATIBLE_SCORE,
    }
}

fn compatible(source: ValueType, target: FieldType) -> bool {
    match source {
        ValueType::String => matches!(
            target,
            FieldType::String | FieldType::LocalizedString | FieldType::Id | FieldType::Enum
        ),
        ValueType::Number => matches!(target, FieldType::Number | FieldType::Money),
        ValueType::Boolean => matches!(target, FieldType::Boolean),
        ValueType::Date => matches!(target, FieldType::Date | FieldType::String),
        ValueType::Array => matches!(target, FieldType::Relation | FieldType::Asset),
        ValueType::Object => matches!(target, FieldType::Json | FieldType::Relation),
        ValueType::Mixed | ValueType::Null => true,
    }
}

/// Jaccard similarity of lowercase word sets, scaled to 0-100. Neutral
/// when either description is absent.
pub fn description_score(source: Option<&str>, target: Option<&str>) -> u8 {
    match (source, target) {
        (Some(a), Some(b)) => (jaccard_words(a, b) * 100.0).round() as u8,
        _ => NEUTRAL_SCORE,
    }
}

/// Word-set Jaccard similarity: |intersection| / |union|.
pub fn jaccard_words(a: &str, b: &str) -> f64 {
    let words_a = word_set(a);
    let words_b = word_set(b);
    if words_a.is_empty() && words_b.is_empty() {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

fn word_set(text: &str) -> BTreeSet<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
