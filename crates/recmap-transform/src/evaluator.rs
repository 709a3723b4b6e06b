use serde_json::Value;

use crate::error::TransformError;

/// External sandboxed expression evaluator backing the `custom` transform.
///
/// The core never executes arbitrary code itself; implementations are
/// expected to enforce their own timeout and resource quotas.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, record: &Value) -> Result<Value, TransformError>;
}
