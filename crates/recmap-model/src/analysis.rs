use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_type::ValueType;

/// Statistical profile of one source field across a batch of sample
/// records. Produced once per mapping session and immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFieldAnalysis {
    /// Source field name.
    pub name: String,
    /// Dominant value type, `Mixed` when more than one type was observed.
    pub detected_type: ValueType,
    /// Up to five representative non-empty sample values.
    pub sample_values: Vec<Value>,
    /// Fraction of records where the field was missing or blank (0.0-1.0).
    pub null_ratio: f64,
    /// Fraction of distinct values over record count (0.0-1.0). May
    /// undercount once the tracked-unique cap is reached.
    pub unique_ratio: f64,
    /// Average string length, for string-typed fields.
    #[serde(default)]
    pub avg_length: Option<f64>,
    /// Minimum observed numeric value.
    #[serde(default)]
    pub min_value: Option<f64>,
    /// Maximum observed numeric value.
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Optional description from source metadata.
    #[serde(default)]
    pub description: Option<String>,
}

impl SourceFieldAnalysis {
    /// Bare analysis with just a name and type, used when no sample
    /// records are available.
    pub fn named(name: &str, detected_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            detected_type,
            sample_values: Vec::new(),
            null_ratio: 0.0,
            unique_ratio: 0.0,
            avg_length: None,
            min_value: None,
            max_value: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}
