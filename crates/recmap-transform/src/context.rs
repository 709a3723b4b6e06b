use std::collections::BTreeMap;

use serde_json::Value;

use crate::evaluator::ExpressionEvaluator;
use crate::lookup::LookupTable;

/// Read-only state a transform may consult besides its input value: the
/// record being mapped (for cross-field references), the registered
/// lookup tables, and the optional custom-expression evaluator.
pub struct TransformContext<'a> {
    pub record: &'a Value,
    pub tables: &'a BTreeMap<String, LookupTable>,
    pub evaluator: Option<&'a dyn ExpressionEvaluator>,
}

impl<'a> TransformContext<'a> {
    /// Context with no tables and no evaluator, for standalone use.
    pub fn bare(record: &'a Value) -> Self {
        static EMPTY: std::sync::OnceLock<BTreeMap<String, LookupTable>> =
            std::sync::OnceLock::new();
        Self {
            record,
            tables: EMPTY.get_or_init(BTreeMap::new),
            evaluator: None,
        }
    }
}
