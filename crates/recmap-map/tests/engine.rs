use std::collections::BTreeSet;

use serde_json::json;

use recmap_map::{AutoMapper, ConfigUpdate, SuggestOptions};
use recmap_model::schema::CUSTOM_FIELDS_KEY;
use recmap_model::{
    Confidence, EntityField, EntityFieldSchema, FieldType, SourceFieldAnalysis,
    StaticSchemaProvider, ValueType,
};
use recmap_profile::analyze_source_fields;

fn product_provider() -> StaticSchemaProvider {
    StaticSchemaProvider::new().with_schema(EntityFieldSchema::new(
        "product",
        vec![
            EntityField::new("sku", FieldType::Id).required(),
            EntityField::new("name", FieldType::String).required(),
            EntityField::new("description", FieldType::String),
            EntityField::new("price", FieldType::Money),
            EntityField::new("active", FieldType::Boolean),
            EntityField::new("version", FieldType::Number).readonly(),
            EntityField::new(CUSTOM_FIELDS_KEY, FieldType::Json),
        ],
    ))
}

fn string_field(name: &str) -> SourceFieldAnalysis {
    SourceFieldAnalysis::named(name, ValueType::String)
}

#[test]
fn unknown_entity_yields_no_suggestions() {
    let mapper = AutoMapper::new();
    let suggestions = mapper.suggest_mappings(
        &[string_field("sku")],
        "no-such-entity",
        &SuggestOptions::default(),
        &product_provider(),
    );
    assert!(suggestions.is_empty());
}

#[test]
fn profiled_product_name_maps_to_name() {
    let records = vec![
        json!({"Product_Name": "Widget"}),
        json!({"Product_Name": "Gadget"}),
    ];
    let analyses = analyze_source_fields(&records);

    let mapper = AutoMapper::new();
    let suggestions = mapper.suggest_mappings(
        &analyses,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );

    let suggestion = suggestions
        .iter()
        .find(|s| s.source == "Product_Name")
        .expect("Product_Name maps");
    assert_eq!(suggestion.target, "name");
    assert!(suggestion.score >= 90, "got score {}", suggestion.score);
    assert!(suggestion.reason.contains("alias"));
}

#[test]
fn longer_names_claim_targets_first() {
    let sources = vec![
        SourceFieldAnalysis::named("price", ValueType::Number),
        SourceFieldAnalysis::named("unit_price", ValueType::Number),
    ];
    let mapper = AutoMapper::new();
    let suggestions = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );

    let price_target: Vec<_> = suggestions.iter().filter(|s| s.target == "price").collect();
    assert_eq!(price_target.len(), 1);
    assert_eq!(price_target[0].source, "unit_price");
    // The shorter generic name has no other viable target left
    assert!(!suggestions.iter().any(|s| s.source == "price"));
}

#[test]
fn no_two_suggestions_share_a_target() {
    let sources = vec![
        string_field("sku"),
        string_field("product_code"),
        string_field("item_code"),
        string_field("name"),
        string_field("title"),
    ];
    let mapper = AutoMapper::new();
    let suggestions = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );

    let targets: BTreeSet<&str> = suggestions.iter().map(|s| s.target.as_str()).collect();
    assert_eq!(targets.len(), suggestions.len());
}

#[test]
fn exact_match_reason_cited_even_with_fuzzy_enabled() {
    let sources = vec![SourceFieldAnalysis::named("price", ValueType::Number)];
    let mapper = AutoMapper::new();
    assert!(mapper.config().enable_fuzzy_matching);
    let suggestions = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );
    assert_eq!(suggestions[0].target, "price");
    assert!(suggestions[0].reason.contains("exact name match"));
}

#[test]
fn mixed_source_type_is_type_neutral() {
    let sources = vec![SourceFieldAnalysis::named("price", ValueType::Mixed)];
    let mapper = AutoMapper::new();
    let suggestions = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );
    // exact 100 * 0.65 + neutral 50 * 0.3 + absent 50 * 0.05 = 82.5
    assert_eq!(suggestions[0].score, 83);
    assert_eq!(suggestions[0].confidence, Confidence::Medium);
}

#[test]
fn readonly_targets_are_never_suggested() {
    let sources = vec![SourceFieldAnalysis::named("version", ValueType::Number)];
    let mapper = AutoMapper::new();
    let suggestions = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );
    assert!(!suggestions.iter().any(|s| s.target == "version"));
}

#[test]
fn excluded_fields_are_skipped() {
    let sources = vec![string_field("sku"), string_field("name")];
    let mut mapper = AutoMapper::new();
    mapper.set_config(&ConfigUpdate {
        exclude_fields: Some(vec!["SKU".to_string()]),
        ..ConfigUpdate::default()
    });
    let suggestions = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );
    assert!(!suggestions.iter().any(|s| s.source == "sku"));
    assert!(suggestions.iter().any(|s| s.source == "name"));
}

#[test]
fn custom_field_fallback_for_unmatched_sources() {
    let sources = vec![string_field("zzqx_internal_note")];
    let mapper = AutoMapper::new();
    let options = SuggestOptions {
        include_custom_fields: true,
        config: Some(ConfigUpdate {
            confidence_threshold: Some(0.1),
            ..ConfigUpdate::default()
        }),
        ..SuggestOptions::default()
    };
    let suggestions =
        mapper.suggest_mappings(&sources, "product", &options, &product_provider());

    let fallback = suggestions
        .iter()
        .find(|s| s.source == "zzqx_internal_note")
        .expect("fallback emitted");
    assert_eq!(fallback.target, "customFields.zzqx_internal_note");
    assert_eq!(fallback.score, 20);
    assert_eq!(fallback.confidence, Confidence::Low);
}

#[test]
fn min_confidence_filters_weak_candidates() {
    let sources = vec![SourceFieldAnalysis::named("prise", ValueType::Number)];
    let mapper = AutoMapper::new();
    let relaxed = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions::default(),
        &product_provider(),
    );
    // fuzzy name match keeps it above the default threshold
    assert!(relaxed.iter().any(|s| s.target == "price"));

    let strict = mapper.suggest_mappings(
        &sources,
        "product",
        &SuggestOptions {
            min_confidence: Some(Confidence::High),
            ..SuggestOptions::default()
        },
        &product_provider(),
    );
    assert!(strict.is_empty());
}

#[test]
fn per_call_override_does_not_mutate_engine_config() {
    let mapper = AutoMapper::new();
    let options = SuggestOptions {
        config: Some(ConfigUpdate {
            enable_fuzzy_matching: Some(false),
            ..ConfigUpdate::default()
        }),
        ..SuggestOptions::default()
    };
    let _ = mapper.suggest_mappings(
        &[string_field("name")],
        "product",
        &options,
        &product_provider(),
    );
    assert!(mapper.config().enable_fuzzy_matching);
}
