//! Field mappings, suggestions, and mapping results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transform::TransformConfig;

/// A durable source-path to target-path association plus an ordered
/// transform chain. This is the artifact users and the auto-mapper edit;
/// the transform engine consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Dotted source path (`name`, `meta.tags[0]`).
    pub source: String,
    /// Dotted target path in the mapped output.
    pub target: String,
    /// Transforms applied in order to the mapped value.
    #[serde(default)]
    pub transforms: Vec<TransformConfig>,
    /// When true, a missing/empty source value is a per-record error.
    #[serde(default)]
    pub required: bool,
    /// Substituted when the source value is missing or empty.
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldMapping {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            transforms: Vec::new(),
            required: false,
            default_value: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_transforms(mut self, transforms: Vec<TransformConfig>) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Coarse confidence bucket derived from a numeric match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Bucket boundaries: High at 85, Medium at 60, Low below.
    pub fn from_score(score: u8) -> Self {
        if score >= 85 {
            Confidence::High
        } else if score >= 60 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Minimum score a suggestion must reach to count as this confidence.
    pub fn min_score(&self) -> u8 {
        match self {
            Confidence::Low => 40,
            Confidence::Medium => 60,
            Confidence::High => 85,
        }
    }
}

/// A ranked auto-mapping suggestion. Derived per analysis run, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSuggestion {
    /// Source field name.
    pub source: String,
    /// Target field key.
    pub target: String,
    /// Combined weighted score, 0-100.
    pub score: u8,
    pub confidence: Confidence,
    /// Human-readable match reasons for UI/audit.
    pub reason: String,
    /// Transform chain proposed from type inference, if any.
    #[serde(default)]
    pub suggested_transforms: Option<Vec<TransformConfig>>,
}

impl MappingSuggestion {
    /// Convert an accepted suggestion into an editable field mapping.
    pub fn into_mapping(self) -> FieldMapping {
        FieldMapping {
            source: self.source,
            target: self.target,
            transforms: self.suggested_transforms.unwrap_or_default(),
            required: false,
            default_value: None,
            description: None,
        }
    }
}

/// One per-field failure recorded while mapping a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Source field the failure belongs to.
    pub field: String,
    pub message: String,
    /// Value at the point of failure, when one existed.
    #[serde(default)]
    pub value: Option<Value>,
}

/// Outcome of mapping a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingResult {
    /// True exactly when `errors` is empty.
    pub success: bool,
    /// The mapped record.
    pub data: Value,
    pub errors: Vec<FieldError>,
    pub warnings: Vec<String>,
}

impl MappingResult {
    pub fn new() -> Self {
        Self {
            success: true,
            data: Value::Object(serde_json::Map::new()),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_error(&mut self, field: &str, message: &str, value: Option<Value>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
            value,
        });
        self.success = false;
    }
}

impl Default for MappingResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate counts for a batch mapping call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// Per-record results plus the batch summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<MappingResult>,
    pub summary: BatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_buckets() {
        assert_eq!(Confidence::from_score(100), Confidence::High);
        assert_eq!(Confidence::from_score(85), Confidence::High);
        assert_eq!(Confidence::from_score(84), Confidence::Medium);
        assert_eq!(Confidence::from_score(60), Confidence::Medium);
        assert_eq!(Confidence::from_score(59), Confidence::Low);
        assert_eq!(Confidence::from_score(0), Confidence::Low);
    }

    #[test]
    fn suggestion_converts_to_mapping() {
        let suggestion = MappingSuggestion {
            source: "Product_Name".to_string(),
            target: "name".to_string(),
            score: 91,
            confidence: Confidence::High,
            reason: "alias match".to_string(),
            suggested_transforms: Some(vec![TransformConfig::Trim]),
        };
        let mapping = suggestion.into_mapping();
        assert_eq!(mapping.source, "Product_Name");
        assert_eq!(mapping.target, "name");
        assert_eq!(mapping.transforms, vec![TransformConfig::Trim]);
    }
}
