use thiserror::Error;

/// Failures raised while applying a single transform.
///
/// These are caught at the per-mapping level and recorded as
/// [`FieldError`](recmap_model::FieldError) entries; they only surface as
/// `Err` from the registry API, where exceeding capacity is a caller bug.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("lookup table registry is full (capacity {capacity})")]
    RegistryFull { capacity: usize },
    #[error("cannot parse '{value}' as a number")]
    NumberParse { value: String },
    #[error("invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("math operation '{operation}' requires an operand")]
    MissingOperand { operation: &'static str },
    #[error("math result is not a representable number")]
    NonFiniteResult,
    #[error("invalid json: {0}")]
    JsonParse(String),
    #[error("invalid condition: {0}")]
    InvalidCondition(String),
    #[error("no expression evaluator configured for custom transform")]
    NoEvaluator,
    #[error("{0}")]
    Message(String),
}
