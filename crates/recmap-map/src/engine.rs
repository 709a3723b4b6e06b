//! The auto-mapping engine.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use recmap_model::schema::CUSTOM_FIELDS_KEY;
use recmap_model::{
    Confidence, ConvertKind, EntityField, FieldType, MappingSuggestion, SchemaProvider,
    SourceFieldAnalysis, TransformConfig, ValueType,
};

use crate::aliases::{merged_aliases, reverse_alias_map};
use crate::config::{AutoMapperConfig, ConfigUpdate};
use crate::score::{description_score, type_score};
use crate::strategy::{MatchContext, MatchStrategy, default_strategies, first_match, normalize_name};

/// Score given to the synthetic custom-field fallback suggestion.
const CUSTOM_FIELD_FALLBACK_SCORE: u8 = 20;

/// Per-call options for [`AutoMapper::suggest_mappings`].
#[derive(Debug, Clone, Default)]
pub struct SuggestOptions {
    /// Floor on the confidence bucket of accepted suggestions.
    pub min_confidence: Option<Confidence>,
    /// Emit low-confidence fallbacks onto the schema's custom-fields
    /// container for otherwise unmatched source fields.
    pub include_custom_fields: bool,
    /// Per-call configuration override, merged over the engine's config.
    pub config: Option<ConfigUpdate>,
}

/// Suggests source-to-target field mappings for one entity schema.
///
/// Each instance owns its configuration; construct one per caller instead
/// of sharing a mutable global. Concurrent `suggest_mappings` calls on a
/// shared instance are fine, but `set_config`/`reset_config` require
/// external serialization against them.
#[derive(Debug, Clone, Default)]
pub struct AutoMapper {
    config: AutoMapperConfig,
}

struct Candidate {
    target: String,
    score: u8,
    reason: String,
    suggested_transforms: Option<Vec<TransformConfig>>,
}

impl AutoMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AutoMapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoMapperConfig {
        &self.config
    }

    /// Deep-merges a partial update into the owned configuration.
    pub fn set_config(&mut self, update: &ConfigUpdate) {
        self.config.apply(update);
    }

    /// Restores the default configuration.
    pub fn reset_config(&mut self) {
        self.config = AutoMapperConfig::default();
    }

    /// Produces ranked mapping suggestions for `source_fields` against the
    /// schema of `target_entity`.
    ///
    /// Longer source names are assigned first so specific names are not
    /// starved of good targets by generic ones; each target field is
    /// claimed at most once. Returns an empty list for unknown entities.
    pub fn suggest_mappings(
        &self,
        source_fields: &[SourceFieldAnalysis],
        target_entity: &str,
        options: &SuggestOptions,
        provider: &dyn SchemaProvider,
    ) -> Vec<MappingSuggestion> {
        let Some(schema) = provider.field_schema(target_entity) else {
            debug!(entity = target_entity, "no schema for entity, no suggestions");
            return Vec::new();
        };

        let config = match &options.config {
            Some(update) => self.config.merged(update),
            None => self.config.clone(),
        };
        let chain = default_strategies(
            reverse_alias_map(&merged_aliases(&config.custom_aliases), config.case_sensitive),
            config.enable_fuzzy_matching,
        );
        let min_score = effective_min_score(&config, options.min_confidence);
        let fold = |name: &str| fold_name(name, config.case_sensitive);

        let excluded: BTreeSet<String> =
            config.exclude_fields.iter().map(|name| fold(name)).collect();
        let mut ordered: Vec<&SourceFieldAnalysis> = source_fields
            .iter()
            .filter(|field| !excluded.contains(&fold(&field.name)))
            .collect();
        ordered.sort_by_key(|field| (Reverse(field.name.len()), field.name.clone()));

        let targets: Vec<(&EntityField, String, String)> = schema
            .fields
            .iter()
            .filter(|field| !field.readonly)
            .map(|field| (field, fold(&field.key), normalize_name(&field.key)))
            .collect();
        let emit_custom_fallback = options.include_custom_fields && schema.has_custom_fields();

        let mut claimed: BTreeSet<String> = BTreeSet::new();
        let mut accepted: Vec<MappingSuggestion> = Vec::new();

        for source in ordered {
            let source_cmp = fold(&source.name);
            let source_norm = normalize_name(&source.name);
            let mut candidates = Vec::new();

            for (field, target_cmp, target_norm) in &targets {
                candidates.push(score_candidate(
                    source,
                    field,
                    &chain,
                    &MatchContext {
                        source_cmp: &source_cmp,
                        source_norm: &source_norm,
                        target_cmp,
                        target_norm,
                        target_key: &field.key,
                    },
                    &config,
                ));
            }
            if emit_custom_fallback {
                candidates.push(Candidate {
                    target: format!("{CUSTOM_FIELDS_KEY}.{}", source.name),
                    score: CUSTOM_FIELD_FALLBACK_SCORE,
                    reason: "custom field fallback".to_string(),
                    suggested_transforms: None,
                });
            }

            candidates.sort_by(|a, b| match b.score.cmp(&a.score) {
                Ordering::Equal => a.target.cmp(&b.target),
                other => other,
            });

            for candidate in candidates {
                if candidate.score < min_score || claimed.contains(&candidate.target) {
                    continue;
                }
                debug!(
                    source = %source.name,
                    target = %candidate.target,
                    score = candidate.score,
                    "accepted suggestion"
                );
                claimed.insert(candidate.target.clone());
                accepted.push(MappingSuggestion {
                    source: source.name.clone(),
                    target: candidate.target,
                    score: candidate.score,
                    confidence: Confidence::from_score(candidate.score),
                    reason: candidate.reason,
                    suggested_transforms: candidate.suggested_transforms,
                });
                break;
            }
        }

        accepted.sort_by(|a, b| match b.score.cmp(&a.score) {
            Ordering::Equal => a.source.cmp(&b.source),
            other => other,
        });
        accepted
    }
}

fn fold_name(name: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}

fn effective_min_score(config: &AutoMapperConfig, min_confidence: Option<Confidence>) -> u8 {
    let from_threshold = (config.confidence_threshold * 100.0).round().clamp(0.0, 100.0) as u8;
    let from_confidence = min_confidence.map_or(0, |level| level.min_score());
    from_threshold.max(from_confidence)
}

fn score_candidate(
    source: &SourceFieldAnalysis,
    target: &EntityField,
    chain: &[Box<dyn MatchStrategy>],
    ctx: &MatchContext<'_>,
    config: &AutoMapperConfig,
) -> Candidate {
    let name_match = first_match(chain, ctx);
    let name_score = name_match.as_ref().map_or(0, |m| m.score);
    let type_points = type_score(
        source.detected_type,
        target.field_type,
        config.enable_type_inference,
    );
    let description_points =
        description_score(source.description.as_deref(), target.description.as_deref());

    let weights = &config.weights;
    let weighted = f64::from(name_score) * weights.name_similarity
        + f64::from(type_points) * weights.type_compatibility
        + f64::from(description_points) * weights.description_match;
    let score = weighted.round().clamp(0.0, 100.0) as u8;

    let mut reasons: Vec<String> = Vec::new();
    if let Some(name_match) = name_match {
        reasons.push(name_match.reason);
    }
    if type_points >= 80 {
        reasons.push(format!(
            "source type {} fits target type {}",
            source.detected_type,
            target.field_type.as_str()
        ));
    } else if type_points <= 30 {
        reasons.push(format!(
            "source type {} does not fit target type {}",
            source.detected_type,
            target.field_type.as_str()
        ));
    }
    if description_points > 60 {
        reasons.push(format!("descriptions overlap ({description_points}%)"));
    }
    if reasons.is_empty() {
        reasons.push("weak combined match".to_string());
    }

    Candidate {
        target: target.key.clone(),
        score,
        reason: reasons.join("; "),
        suggested_transforms: config
            .enable_type_inference
            .then(|| suggest_transforms(source, target))
            .flatten(),
    }
}

/// Proposes a transform chain bridging a source field's detected type to
/// the target field type. Only string sources get suggestions; other
/// source types either fit directly or need manual attention.
pub fn suggest_transforms(
    source: &SourceFieldAnalysis,
    target: &EntityField,
) -> Option<Vec<TransformConfig>> {
    if source.detected_type != ValueType::String {
        return None;
    }
    let transforms = match target.field_type {
        FieldType::Number | FieldType::Money => vec![TransformConfig::Convert {
            from: ConvertKind::String,
            to: ConvertKind::Number,
        }],
        FieldType::Boolean => {
            if samples_look_boolean(&source.sample_values) {
                vec![TransformConfig::Map {
                    values: boolean_token_map(),
                    case_insensitive: true,
                    default: None,
                }]
            } else {
                vec![TransformConfig::Convert {
                    from: ConvertKind::String,
                    to: ConvertKind::Boolean,
                }]
            }
        }
        FieldType::Date => vec![TransformConfig::Convert {
            from: ConvertKind::String,
            to: ConvertKind::Date,
        }],
        FieldType::String => vec![TransformConfig::Trim],
        FieldType::LocalizedString => vec![TransformConfig::Template {
            template: "${value}".to_string(),
        }],
        _ => return None,
    };
    Some(transforms)
}

const BOOLEAN_TOKENS: &[(&str, bool)] = &[
    ("true", true),
    ("yes", true),
    ("y", true),
    ("1", true),
    ("on", true),
    ("false", false),
    ("no", false),
    ("n", false),
    ("0", false),
    ("off", false),
];

fn boolean_token_map() -> BTreeMap<String, Value> {
    BOOLEAN_TOKENS
        .iter()
        .map(|(token, value)| ((*token).to_string(), Value::Bool(*value)))
        .collect()
}

fn samples_look_boolean(samples: &[Value]) -> bool {
    let mut seen = false;
    for sample in samples {
        let Some(text) = sample.as_str() else {
            return false;
        };
        let token = text.trim().to_lowercase();
        if !BOOLEAN_TOKENS.iter().any(|(known, _)| *known == token) {
            return false;
        }
        seen = true;
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn min_score_takes_the_stricter_bound() {
        let config = AutoMapperConfig {
            confidence_threshold: 0.3,
            ..AutoMapperConfig::default()
        };
        assert_eq!(effective_min_score(&config, None), 30);
        assert_eq!(effective_min_score(&config, Some(Confidence::Medium)), 60);
        let strict = AutoMapperConfig {
            confidence_threshold: 0.9,
            ..AutoMapperConfig::default()
        };
        assert_eq!(effective_min_score(&strict, Some(Confidence::Medium)), 90);
    }

    #[test]
    fn boolean_like_samples_get_a_map_transform() {
        let mut source = SourceFieldAnalysis::named("active", ValueType::String);
        source.sample_values = vec![json!("yes"), json!("No"), json!("yes")];
        let target = EntityField::new("active", FieldType::Boolean);
        let transforms = suggest_transforms(&source, &target).expect("suggestion");
        assert!(matches!(transforms[0], TransformConfig::Map { .. }));

        source.sample_values = vec![json!("enabled"), json!("disabled")];
        let transforms = suggest_transforms(&source, &target).expect("suggestion");
        assert!(matches!(
            transforms[0],
            TransformConfig::Convert { to: ConvertKind::Boolean, .. }
        ));
    }

    #[test]
    fn non_string_sources_get_no_suggestion() {
        let source = SourceFieldAnalysis::named("count", ValueType::Number);
        let target = EntityField::new("count", FieldType::Number);
        assert!(suggest_transforms(&source, &target).is_none());
    }
}
