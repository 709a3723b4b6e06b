//! The transform engine: applies field mappings to records.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use recmap_common::{get_path, is_empty_value, set_path};
use recmap_model::{BatchResult, BatchSummary, FieldMapping, MappingResult};

use crate::context::TransformContext;
use crate::error::TransformError;
use crate::evaluator::ExpressionEvaluator;
use crate::lookup::LookupTable;
use crate::transforms::apply_transform;

/// Upper bound on distinct registered lookup tables.
pub const MAX_LOOKUP_TABLES: usize = 200;

/// Applies [`FieldMapping`] chains to records.
///
/// Holds the lookup-table registry and the optional sandboxed expression
/// evaluator; the mapping logic itself is stateless per call.
#[derive(Default)]
pub struct TransformEngine {
    tables: BTreeMap<String, LookupTable>,
    evaluator: Option<Box<dyn ExpressionEvaluator>>,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the evaluator backing `custom` transforms.
    pub fn with_evaluator(mut self, evaluator: Box<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Registers a lookup table under its name. Replacing an existing name
    /// is always allowed; a new name past the capacity bound is rejected.
    pub fn register_lookup_table(&mut self, table: LookupTable) -> Result<(), TransformError> {
        if !self.tables.contains_key(&table.name) && self.tables.len() >= MAX_LOOKUP_TABLES {
            return Err(TransformError::RegistryFull {
                capacity: MAX_LOOKUP_TABLES,
            });
        }
        debug!(table = %table.name, rows = table.data.len(), "registering lookup table");
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn clear_lookup_tables(&mut self) {
        self.tables.clear();
    }

    pub fn lookup_table(&self, name: &str) -> Option<&LookupTable> {
        self.tables.get(name)
    }

    /// Maps one record through `mappings`. Each mapping is independent: a
    /// failure is recorded against its source field and the remaining
    /// mappings still run.
    pub fn map_record(&self, record: &Value, mappings: &[FieldMapping]) -> MappingResult {
        let mut result = MappingResult::new();
        let ctx = TransformContext {
            record,
            tables: &self.tables,
            evaluator: self.evaluator.as_deref(),
        };

        for mapping in mappings {
            // A missing source key is distinct from a present null: the
            // former never reaches the target, the latter writes null.
            let mut value: Option<Value> = get_path(record, &mapping.source).cloned();

            if value.as_ref().is_none_or(is_empty_value)
                && let Some(default) = &mapping.default_value
            {
                value = Some(default.clone());
            }

            if mapping.required && value.as_ref().is_none_or(is_empty_value) {
                result.push_error(
                    &mapping.source,
                    &format!("required field '{}' is missing or empty", mapping.source),
                    None,
                );
                continue;
            }

            if let Some(current) = value.as_mut()
                && !is_empty_value(current)
            {
                for transform in &mapping.transforms {
                    match apply_transform(current, transform, &ctx) {
                        Ok(next) => *current = next,
                        Err(err) => {
                            result.push_error(
                                &mapping.source,
                                &format!("transform '{}' failed: {err}", transform.kind()),
                                Some(current.clone()),
                            );
                        }
                    }
                }
            }

            if let Some(value) = value
                && (!is_empty_value(&value) || !mapping.required)
                && let Err(err) = set_path(&mut result.data, &mapping.target, value)
            {
                result.push_error(
                    &mapping.source,
                    &format!("cannot write target '{}': {err}", mapping.target),
                    None,
                );
            }
        }

        result
    }

    /// Maps a batch of records, aggregating per-record results and counts.
    pub fn map_records(&self, records: &[Value], mappings: &[FieldMapping]) -> BatchResult {
        let results: Vec<MappingResult> = records
            .iter()
            .map(|record| self.map_record(record, mappings))
            .collect();
        let success = results.iter().filter(|r| r.success).count();
        let summary = BatchSummary {
            total: results.len(),
            success,
            failed: results.len() - success,
        };
        debug!(
            total = summary.total,
            failed = summary.failed,
            "mapped record batch"
        );
        BatchResult { results, summary }
    }
}
