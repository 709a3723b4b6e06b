//! Source field profiling.
//!
//! Scans a batch of sample records and produces one
//! [`SourceFieldAnalysis`] per field, feeding the auto-mapper's type and
//! statistics scoring.

mod analyzer;

pub use analyzer::{MAX_SAMPLE_VALUES, MAX_UNIQUE_TRACKED, analyze_source_fields};
