//! Batch analysis of sample records.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use recmap_common::{detect_value_type, is_empty_value, parse_number};
use recmap_model::{SourceFieldAnalysis, ValueType};

/// Representative sample values kept per field.
pub const MAX_SAMPLE_VALUES: usize = 5;

/// Distinct values tracked per field. Once the cap is reached further
/// insertions are ignored, so `unique_ratio` may undercount.
pub const MAX_UNIQUE_TRACKED: usize = 1000;

#[derive(Default)]
struct FieldStats {
    histogram: BTreeMap<ValueType, usize>,
    samples: Vec<Value>,
    unique: BTreeSet<String>,
    unique_capped: bool,
    null_count: usize,
    length_sum: usize,
    string_count: usize,
    min_value: Option<f64>,
    max_value: Option<f64>,
}

impl FieldStats {
    fn observe(&mut self, value: Option<&Value>) {
        let Some(value) = value else {
            self.null_count += 1;
            return;
        };
        if is_empty_value(value) {
            self.null_count += 1;
            return;
        }

        let value_type = detect_value_type(value);
        *self.histogram.entry(value_type).or_insert(0) += 1;

        if self.samples.len() < MAX_SAMPLE_VALUES {
            self.samples.push(value.clone());
        }
        if !self.unique_capped {
            self.unique.insert(unique_key(value));
            if self.unique.len() >= MAX_UNIQUE_TRACKED {
                self.unique_capped = true;
            }
        }

        match value_type {
            ValueType::Number => {
                if let Some(number) = numeric_value(value) {
                    self.min_value = Some(self.min_value.map_or(number, |m| m.min(number)));
                    self.max_value = Some(self.max_value.map_or(number, |m| m.max(number)));
                }
            }
            ValueType::String => {
                if let Some(s) = value.as_str() {
                    self.length_sum += s.len();
                    self.string_count += 1;
                }
            }
            _ => {}
        }
    }

    fn detected_type(&self) -> ValueType {
        let mut kinds = self.histogram.keys();
        match (kinds.next(), kinds.next()) {
            (None, _) => ValueType::Null,
            (Some(kind), None) => *kind,
            _ => ValueType::Mixed,
        }
    }

    fn into_analysis(self, name: String, total: usize) -> SourceFieldAnalysis {
        let detected_type = self.detected_type();
        let avg_length = (self.string_count > 0)
            .then(|| self.length_sum as f64 / self.string_count as f64);
        SourceFieldAnalysis {
            name,
            detected_type,
            sample_values: self.samples,
            null_ratio: ratio(self.null_count, total),
            unique_ratio: ratio(self.unique.len(), total),
            avg_length,
            min_value: self.min_value,
            max_value: self.max_value,
            description: None,
        }
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn unique_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Profiles a batch of records into per-field analyses.
///
/// The field set is the union of keys across *all* records, in first-seen
/// order. Records that are not objects contribute nothing but still count
/// toward the ratios.
pub fn analyze_source_fields(records: &[Value]) -> Vec<SourceFieldAnalysis> {
    let total = records.len();
    if total == 0 {
        return Vec::new();
    }

    let mut field_order: Vec<String> = Vec::new();
    let mut stats: BTreeMap<String, FieldStats> = BTreeMap::new();
    for record in records {
        let Some(map) = record.as_object() else {
            continue;
        };
        for key in map.keys() {
            if !stats.contains_key(key) {
                field_order.push(key.clone());
                stats.insert(key.clone(), FieldStats::default());
            }
        }
    }

    for record in records {
        let map = record.as_object();
        for (name, field_stats) in stats.iter_mut() {
            field_stats.observe(map.and_then(|m| m.get(name)));
        }
    }

    debug!(records = total, fields = field_order.len(), "profiled source records");

    field_order
        .into_iter()
        .filter_map(|name| {
            let field_stats = stats.remove(&name)?;
            Some(field_stats.into_analysis(name, total))
        })
        .collect()
}
