//! Auto-mapper configuration.
//!
//! Each [`AutoMapper`](crate::engine::AutoMapper) owns its configuration;
//! there is no process-global state. Updates deep-merge `weights` and
//! `custom_aliases` and replace `exclude_fields` wholesale. Validation
//! reports problems as data rather than failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aliases::MAX_ALIAS_ENTRIES;

/// Relative weight of each scoring component. Should sum to roughly 1.0;
/// this is warned about, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub name_similarity: f64,
    pub type_compatibility: f64,
    pub description_match: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name_similarity: 0.65,
            type_compatibility: 0.3,
            description_match: 0.05,
        }
    }
}

/// Partial weight update; unset components keep their current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeightsUpdate {
    #[serde(default)]
    pub name_similarity: Option<f64>,
    #[serde(default)]
    pub type_compatibility: Option<f64>,
    #[serde(default)]
    pub description_match: Option<f64>,
}

/// Auto-mapper tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMapperConfig {
    /// Minimum weighted score, expressed in 0.0-1.0, for a suggestion to
    /// be accepted.
    pub confidence_threshold: f64,
    pub enable_fuzzy_matching: bool,
    pub enable_type_inference: bool,
    pub case_sensitive: bool,
    /// Extra canonical-to-aliases entries merged over the built-in table.
    pub custom_aliases: BTreeMap<String, Vec<String>>,
    /// Source field names skipped entirely during suggestion.
    pub exclude_fields: Vec<String>,
    pub weights: ScoreWeights,
}

impl Default for AutoMapperConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.4,
            enable_fuzzy_matching: true,
            enable_type_inference: true,
            case_sensitive: false,
            custom_aliases: BTreeMap::new(),
            exclude_fields: Vec::new(),
            weights: ScoreWeights::default(),
        }
    }
}

impl AutoMapperConfig {
    /// Applies a partial update: scalar fields overwrite, `weights` and
    /// `custom_aliases` deep-merge, `exclude_fields` replaces wholesale.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(threshold) = update.confidence_threshold {
            self.confidence_threshold = threshold;
        }
        if let Some(fuzzy) = update.enable_fuzzy_matching {
            self.enable_fuzzy_matching = fuzzy;
        }
        if let Some(inference) = update.enable_type_inference {
            self.enable_type_inference = inference;
        }
        if let Some(case_sensitive) = update.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(weights) = &update.weights {
            if let Some(name) = weights.name_similarity {
                self.weights.name_similarity = name;
            }
            if let Some(type_compat) = weights.type_compatibility {
                self.weights.type_compatibility = type_compat;
            }
            if let Some(description) = weights.description_match {
                self.weights.description_match = description;
            }
        }
        if let Some(aliases) = &update.custom_aliases {
            for (canonical, new_aliases) in aliases {
                let entry = self.custom_aliases.entry(canonical.clone()).or_default();
                for alias in new_aliases {
                    if !entry.iter().any(|existing| existing == alias) {
                        entry.push(alias.clone());
                    }
                }
            }
        }
        if let Some(exclude) = &update.exclude_fields {
            self.exclude_fields = exclude.clone();
        }
    }

    /// Returns a copy of this config with `update` applied.
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        let mut merged = self.clone();
        merged.apply(update);
        merged
    }
}

/// Partial configuration override, both for `set_config` and per-call use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub confidence_threshold: Option<f64>,
    #[serde(default)]
    pub enable_fuzzy_matching: Option<bool>,
    #[serde(default)]
    pub enable_type_inference: Option<bool>,
    #[serde(default)]
    pub case_sensitive: Option<bool>,
    #[serde(default)]
    pub custom_aliases: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub exclude_fields: Option<Vec<String>>,
    #[serde(default)]
    pub weights: Option<WeightsUpdate>,
}

/// Outcome of configuration validation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConfigReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a configuration for out-of-range values.
///
/// Configuration problems are surfaced here as errors/warnings, never as
/// panics or `Err` returns from the engine.
pub fn validate_config(config: &AutoMapperConfig) -> ConfigReport {
    let mut report = ConfigReport::default();

    if !(0.0..=1.0).contains(&config.confidence_threshold) {
        report.errors.push(format!(
            "confidence_threshold must be within [0, 1], got {}",
            config.confidence_threshold
        ));
    }

    for (name, weight) in [
        ("name_similarity", config.weights.name_similarity),
        ("type_compatibility", config.weights.type_compatibility),
        ("description_match", config.weights.description_match),
    ] {
        if !(0.0..=1.0).contains(&weight) {
            report
                .errors
                .push(format!("weight {name} must be within [0, 1], got {weight}"));
        }
    }

    let weight_sum = config.weights.name_similarity
        + config.weights.type_compatibility
        + config.weights.description_match;
    if (weight_sum - 1.0).abs() > 0.01 {
        warn!(weight_sum, "score weights do not sum to 1.0");
        report
            .warnings
            .push(format!("weights sum to {weight_sum:.2}, expected ~1.0"));
    }

    let alias_entries: usize = config.custom_aliases.values().map(Vec::len).sum();
    if alias_entries > MAX_ALIAS_ENTRIES {
        report.errors.push(format!(
            "custom alias entries ({alias_entries}) exceed the limit of {MAX_ALIAS_ENTRIES}"
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_merges_weights_and_aliases() {
        let mut config = AutoMapperConfig::default();
        config
            .custom_aliases
            .insert("sku".to_string(), vec!["artnr".to_string()]);

        let mut aliases = BTreeMap::new();
        aliases.insert("sku".to_string(), vec!["artnr".to_string(), "item".to_string()]);
        let update = ConfigUpdate {
            weights: Some(WeightsUpdate {
                name_similarity: Some(0.5),
                ..WeightsUpdate::default()
            }),
            custom_aliases: Some(aliases),
            exclude_fields: Some(vec!["internal_id".to_string()]),
            ..ConfigUpdate::default()
        };
        config.apply(&update);

        assert!((config.weights.name_similarity - 0.5).abs() < f64::EPSILON);
        // Untouched weight components survive the merge
        assert!((config.weights.type_compatibility - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.custom_aliases["sku"], vec!["artnr", "item"]);
        assert_eq!(config.exclude_fields, vec!["internal_id"]);
    }

    #[test]
    fn exclude_fields_replace_wholesale() {
        let mut config = AutoMapperConfig {
            exclude_fields: vec!["a".to_string(), "b".to_string()],
            ..AutoMapperConfig::default()
        };
        config.apply(&ConfigUpdate {
            exclude_fields: Some(vec!["c".to_string()]),
            ..ConfigUpdate::default()
        });
        assert_eq!(config.exclude_fields, vec!["c"]);
    }

    #[test]
    fn validation_flags_bad_threshold_and_weights() {
        let config = AutoMapperConfig {
            confidence_threshold: 1.5,
            weights: ScoreWeights {
                name_similarity: -0.2,
                type_compatibility: 0.3,
                description_match: 0.05,
            },
            ..AutoMapperConfig::default()
        };
        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn validation_warns_on_weight_sum() {
        let config = AutoMapperConfig {
            weights: ScoreWeights {
                name_similarity: 0.5,
                type_compatibility: 0.3,
                description_match: 0.05,
            },
            ..AutoMapperConfig::default()
        };
        let report = validate_config(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
