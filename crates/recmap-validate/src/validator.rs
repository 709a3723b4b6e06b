//! Mapping-set validation rules.
//!
//! - unknown target entity: report is immediately invalid with one error
//! - duplicate target paths: error
//! - target root segment neither `customFields` nor a schema key: error
//! - target is a readonly schema field: error
//! - required schema field with no mapping targeting it: warning

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use recmap_model::schema::CUSTOM_FIELDS_KEY;
use recmap_model::{FieldMapping, SchemaProvider};

/// Outcome of validating one mapping set. `valid` is false exactly when
/// `errors` is non-empty; warnings never affect it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn push_error(&mut self, message: String) {
        self.errors.push(message);
        self.valid = false;
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Validates `mappings` against the schema of `target_entity`.
pub fn validate_mappings(
    mappings: &[FieldMapping],
    target_entity: &str,
    provider: &dyn SchemaProvider,
) -> ValidationReport {
    let mut report = ValidationReport {
        valid: true,
        ..ValidationReport::default()
    };

    let Some(schema) = provider.field_schema(target_entity) else {
        report.push_error(format!("unknown target entity '{target_entity}'"));
        return report;
    };

    let mut seen_targets = BTreeSet::new();
    let mut mapped_roots = BTreeSet::new();

    for mapping in mappings {
        if !seen_targets.insert(mapping.target.as_str()) {
            report.push_error(format!("duplicate target '{}'", mapping.target));
            continue;
        }

        let root = mapping
            .target
            .split(['.', '['])
            .next()
            .unwrap_or(mapping.target.as_str());
        mapped_roots.insert(root.to_string());

        if root == CUSTOM_FIELDS_KEY {
            continue;
        }
        match schema.field(root) {
            None => report.push_error(format!(
                "unknown target field '{}' on entity '{}'",
                mapping.target, schema.entity
            )),
            Some(field) if field.readonly => report.push_error(format!(
                "target field '{}' is readonly",
                mapping.target
            )),
            Some(_) => {}
        }
    }

    for field in &schema.fields {
        if field.required && !mapped_roots.contains(&field.key) {
            report
                .warnings
                .push(format!("required field '{}' has no mapping", field.key));
        }
    }

    debug!(
        entity = target_entity,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated mapping set"
    );
    report
}
