//! Transform execution for record mapping.
//!
//! The [`TransformEngine`] applies [`FieldMapping`](recmap_model::FieldMapping)
//! chains to records, isolating failures per field: one bad mapping never
//! aborts the record, one bad record never aborts the batch.
//!
//! - **engine**: `map_record`/`map_records` plus the bounded lookup registry
//! - **transforms**: pure per-kind transform functions
//! - **condition**: the small expression grammar for `conditional`
//! - **datetime**: flexible date parsing and token formatting
//! - **evaluator**: the sandboxed-evaluator seam for `custom`

pub mod condition;
pub mod context;
pub mod datetime;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod lookup;
pub mod transforms;

pub use context::TransformContext;
pub use engine::{MAX_LOOKUP_TABLES, TransformEngine};
pub use error::TransformError;
pub use evaluator::ExpressionEvaluator;
pub use lookup::LookupTable;
pub use transforms::apply_transform;
