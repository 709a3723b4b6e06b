//! Auto-mapping suggestion engine.
//!
//! Given profiled source fields and a target entity schema, the
//! [`AutoMapper`] scores every (source, target) pair by name similarity
//! (through an ordered strategy chain), type compatibility, and
//! description overlap, then performs a greedy one-to-one assignment and
//! returns ranked [`MappingSuggestion`]s.

pub mod aliases;
pub mod config;
pub mod engine;
pub mod score;
pub mod strategy;

pub use aliases::{MAX_ALIAS_ENTRIES, builtin_aliases, merged_aliases, reverse_alias_map};
pub use config::{AutoMapperConfig, ConfigReport, ConfigUpdate, ScoreWeights, validate_config};
pub use engine::{AutoMapper, SuggestOptions};
pub use strategy::{
    MatchContext, MatchStrategy, NameMatch, default_strategies, positional_strategies,
};
