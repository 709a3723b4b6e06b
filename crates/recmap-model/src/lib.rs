//! Shared data model for the record mapping core.
//!
//! This crate defines the types exchanged between the profiler, the
//! auto-mapper, the transform engine, and the validator:
//!
//! - **schema**: target entity field schemas and the [`SchemaProvider`] trait
//! - **analysis**: per-field statistics produced by the source profiler
//! - **transform**: the tagged-union transform configuration
//! - **mapping**: field mappings, suggestions, and per-record results

pub mod analysis;
pub mod mapping;
pub mod schema;
pub mod transform;
pub mod value_type;

pub use analysis::SourceFieldAnalysis;
pub use mapping::{
    BatchResult, BatchSummary, Confidence, FieldError, FieldMapping, MappingResult,
    MappingSuggestion,
};
pub use schema::{EntityField, EntityFieldSchema, FieldType, SchemaProvider, StaticSchemaProvider};
pub use transform::{ConvertKind, MathOp, TransformConfig};
pub use value_type::ValueType;
