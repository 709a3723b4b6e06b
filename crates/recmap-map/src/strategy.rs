//! Name matching strategies.
//!
//! Strategies are evaluated in priority order; the first one producing a
//! match wins. The default chain is exact, normalized, alias, partial,
//! fuzzy. Two positional part-matching strategies (camelCase and
//! snake_case aware) are provided for opt-in callers but deliberately not
//! wired into the default chain.

use std::collections::BTreeMap;

use rapidfuzz::distance::levenshtein;

/// Minimum Levenshtein similarity for the fuzzy strategy to match.
const FUZZY_THRESHOLD: f64 = 0.6;

/// Names of a (source, target) pair in the forms the strategies compare.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Source name, case-folded unless matching case-sensitively.
    pub source_cmp: &'a str,
    /// Source name with separators stripped and case folded.
    pub source_norm: &'a str,
    /// Target key, case-folded unless matching case-sensitively.
    pub target_cmp: &'a str,
    /// Target key with separators stripped and case folded.
    pub target_norm: &'a str,
    /// Target key exactly as the schema declares it.
    pub target_key: &'a str,
}

/// A successful name match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// Name score, 0-100.
    pub score: u8,
    /// Reason string surfaced in suggestion audit output.
    pub reason: String,
}

/// One name-matching rule.
pub trait MatchStrategy {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch>;
}

/// Strips separators (`-`, `_`, whitespace) and case-folds. Dots are kept:
/// they delimit path segments, not words within a name.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' ' | '\t'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Score 100: comparison forms are identical.
pub struct ExactStrategy;

impl MatchStrategy for ExactStrategy {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        (ctx.source_cmp == ctx.target_cmp).then(|| NameMatch {
            score: 100,
            reason: "exact name match".to_string(),
        })
    }
}

/// Score 95: names are equal once separators and case are removed.
pub struct NormalizedStrategy;

impl MatchStrategy for NormalizedStrategy {
    fn name(&self) -> &'static str {
        "normalized"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        (!ctx.source_norm.is_empty() && ctx.source_norm == ctx.target_norm).then(|| NameMatch {
            score: 95,
            reason: "name match after normalization".to_string(),
        })
    }
}

/// Score 90: the source name is a known alias of the target key.
pub struct AliasStrategy {
    reverse: BTreeMap<String, String>,
}

impl AliasStrategy {
    /// `reverse` maps alias to canonical key, pre-folded for the active
    /// case-sensitivity (see [`reverse_alias_map`](crate::aliases::reverse_alias_map)).
    pub fn new(reverse: BTreeMap<String, String>) -> Self {
        Self { reverse }
    }
}

impl MatchStrategy for AliasStrategy {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        let canonical = self.reverse.get(ctx.source_cmp)?;
        (canonical == ctx.target_cmp).then(|| NameMatch {
            score: 90,
            reason: format!("known alias of '{}'", ctx.target_key),
        })
    }
}

/// Score 60: one normalized name contains the other.
pub struct PartialStrategy;

impl MatchStrategy for PartialStrategy {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        if ctx.source_norm.is_empty() || ctx.target_norm.is_empty() {
            return None;
        }
        let contains = ctx.source_norm.contains(ctx.target_norm)
            || ctx.target_norm.contains(ctx.source_norm);
        contains.then(|| NameMatch {
            score: 60,
            reason: "partial name match".to_string(),
        })
    }
}

/// Score `round(similarity * 50)` when Levenshtein similarity over the
/// normalized forms exceeds 0.6.
pub struct FuzzyStrategy;

impl MatchStrategy for FuzzyStrategy {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        let similarity =
            levenshtein::normalized_similarity(ctx.source_norm.chars(), ctx.target_norm.chars());
        (similarity > FUZZY_THRESHOLD).then(|| NameMatch {
            score: (similarity * 50.0).round() as u8,
            reason: format!("fuzzy match ({:.0}% similar)", similarity * 100.0),
        })
    }
}

/// Splits a name into lowercase parts on camelCase boundaries and
/// separators.
fn name_parts(raw: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() {
                spaced.push(' ');
            }
            spaced.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            spaced.push(' ');
            prev_lower = false;
        }
    }
    spaced
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

fn positional_match(source: &str, target: &str, label: &str) -> Option<NameMatch> {
    let source_parts = name_parts(source);
    let target_parts = name_parts(target);
    if source_parts.is_empty() || target_parts.is_empty() {
        return None;
    }
    if source_parts == target_parts {
        return Some(NameMatch {
            score: 90,
            reason: format!("{label} parts match"),
        });
    }
    let prefix = source_parts
        .iter()
        .zip(target_parts.iter())
        .all(|(a, b)| a == b);
    (prefix && source_parts.len() != target_parts.len()).then(|| NameMatch {
        score: 85,
        reason: format!("{label} part prefix match"),
    })
}

/// Score 85-90: camelCase-aware positional part matching. Not part of the
/// default chain.
pub struct CamelCaseStrategy;

impl MatchStrategy for CamelCaseStrategy {
    fn name(&self) -> &'static str {
        "camel-case"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        positional_match(ctx.source_cmp, ctx.target_key, "camelCase")
    }
}

/// Score 85-90: snake_case-aware positional part matching. Not part of the
/// default chain.
pub struct SnakeCaseStrategy;

impl MatchStrategy for SnakeCaseStrategy {
    fn name(&self) -> &'static str {
        "snake-case"
    }

    fn evaluate(&self, ctx: &MatchContext<'_>) -> Option<NameMatch> {
        positional_match(ctx.source_cmp, ctx.target_key, "snake_case")
    }
}

/// The active strategy chain, in evaluation priority order.
pub fn default_strategies(
    reverse_aliases: BTreeMap<String, String>,
    enable_fuzzy: bool,
) -> Vec<Box<dyn MatchStrategy>> {
    let mut chain: Vec<Box<dyn MatchStrategy>> = vec![
        Box::new(ExactStrategy),
        Box::new(NormalizedStrategy),
        Box::new(AliasStrategy::new(reverse_aliases)),
        Box::new(PartialStrategy),
    ];
    if enable_fuzzy {
        chain.push(Box::new(FuzzyStrategy));
    }
    chain
}

/// The positional part-matching strategies, for callers that opt in.
pub fn positional_strategies() -> Vec<Box<dyn MatchStrategy>> {
    vec![Box::new(CamelCaseStrategy), Box::new(SnakeCaseStrategy)]
}

/// Runs a chain and returns the first match.
pub fn first_match(
    chain: &[Box<dyn MatchStrategy>],
    ctx: &MatchContext<'_>,
) -> Option<NameMatch> {
    chain.iter().find_map(|strategy| strategy.evaluate(ctx))
}
