//! Adaptive relevance filtering.
//!
//! Short queries are vague, so they get a looser distance ceiling; long,
//! specific queries get a tighter one. Candidates above the ceiling are
//! dropped, and if fewer than `min_results` survive nothing is returned.

use ordered_float::OrderedFloat;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::types::Hit;

/// Queries with at most this many tokens use the loose ceiling.
pub const SHORT_QUERY_MAX_TOKENS: usize = 15;

/// Queries with more than this many tokens use the tight ceiling.
pub const LONG_QUERY_MIN_TOKENS: usize = 30;

/// How far the loose and tight ceilings sit from the baseline.
pub const CEILING_STEP: f64 = 0.10;

/// Number of words in the lowercased query.
pub fn token_count(query: &str) -> usize {
    query.to_lowercase().unicode_words().count()
}

/// Maximum distance a hit may have for a query of `token_count` tokens.
///
/// With the default baseline of 0.65 the bands are 0.75 (up to 15 tokens),
/// 0.65 (16 to 30) and 0.55 (over 30). Results are clamped to `[0, 2]`.
pub fn effective_ceiling(token_count: usize, base_max_distance: f64) -> f32 {
    let ceiling = if token_count <= SHORT_QUERY_MAX_TOKENS {
        base_max_distance + CEILING_STEP
    } else if token_count <= LONG_QUERY_MIN_TOKENS {
        base_max_distance
    } else {
        base_max_distance - CEILING_STEP
    };
    ceiling.clamp(0.0, 2.0) as f32
}

/// Keep the candidates worth showing, ascending by distance.
///
/// Returns an empty list when there are no candidates, when even the closest
/// one is beyond the ceiling, or when fewer than `min_results` pass.
pub fn filter(
    candidates: Vec<Hit>,
    query_token_count: usize,
    base_max_distance: f64,
    min_results: usize,
) -> Vec<Hit> {
    let ceiling = effective_ceiling(query_token_count, base_max_distance);

    let Some(closest) = candidates
        .iter()
        .map(|hit| OrderedFloat(hit.distance()))
        .min()
    else {
        return Vec::new();
    };
    if closest.0 > ceiling {
        debug!(
            "Closest candidate at {:.4} exceeds ceiling {ceiling:.2} for {query_token_count} tokens",
            closest.0
        );
        return Vec::new();
    }

    let mut kept: Vec<Hit> = candidates
        .into_iter()
        .filter(|hit| hit.distance() <= ceiling)
        .collect();

    if kept.len() < min_results {
        debug!(
            "Only {} candidates within {ceiling:.2}, need {min_results}",
            kept.len()
        );
        return Vec::new();
    }

    kept.sort_by_key(|hit| OrderedFloat(hit.distance()));
    kept
}
