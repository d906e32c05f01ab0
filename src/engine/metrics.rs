//! Engine run metrics.
//!
//! [`Recommender::run`](super::Recommender::run) returns only the ranked
//! suggestions; [`Recommender::run_with_metrics`](super::Recommender::run_with_metrics)
//! also returns what happened along the way: per-rule timings, contained
//! failures and the field traits of every worksheet. Verbose output and the
//! CLI report are built from this.

use super::traits::FieldTraits;
use crate::suggestion::Suggestion;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run, ranking included.
    pub total: Duration,
    /// Time spent ranking and filtering.
    pub rank: Duration,
    pub worksheets: usize,
    /// One entry per rule, in evaluation order.
    pub rules: Vec<RuleTiming>,
    /// Suggestions produced before ranking filters.
    pub emitted: usize,
    /// Suggestions left after ranking filters.
    pub kept: usize,
}

/// Cumulative numbers for one rule across all worksheets.
#[derive(Debug, Clone)]
pub struct RuleTiming {
    pub rule: &'static str,
    pub elapsed: Duration,
    pub emitted: usize,
    pub failures: usize,
}

impl RuleTiming {
    pub(crate) fn new(rule: &'static str) -> Self {
        RuleTiming { rule, elapsed: Duration::ZERO, emitted: 0, failures: 0 }
    }
}

/// A rule that failed on one worksheet and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDiagnostic {
    pub worksheet: String,
    pub rule: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct WorksheetTraits {
    pub worksheet: String,
    pub traits: FieldTraits,
}

/// Ranked suggestions bundled with what the run observed.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub suggestions: Vec<Suggestion>,
    pub diagnostics: Vec<RuleDiagnostic>,
    /// Document order.
    pub traits: Vec<WorksheetTraits>,
    pub metrics: RunMetrics,
}
