//! Ordering and filtering of a run's suggestions.

use crate::config::RankingConfig;
use crate::suggestion::Suggestion;
use std::cmp::Ordering;

/// Sort by confidence, highest first, then apply the configured filters.
///
/// The sort is stable: equal confidences keep emission order (worksheet
/// order, then rule order). Suggestions below `min_confidence` are dropped
/// before `max_suggestions` truncates, so the limit counts survivors only.
pub fn rank(mut suggestions: Vec<Suggestion>, config: &RankingConfig) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
    suggestions.retain(|s| s.confidence >= config.min_confidence);
    if let Some(max) = config.max_suggestions {
        suggestions.truncate(max);
    }
    suggestions
}
