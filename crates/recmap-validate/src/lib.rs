//! Validation of finished field-mapping sets against a target schema.
//!
//! Runs independently of suggestion and execution: callers hand it any
//! mapping list plus an entity type and get a report of hard errors
//! (unknown or readonly targets, duplicates) and soft warnings
//! (unmapped required fields).

pub mod validator;

pub use validator::{ValidationReport, validate_mappings};
