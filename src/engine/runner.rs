//! Rule evaluation over a workbook.
//!
//! The runner walks worksheets in document order and, for each one, every
//! rule of its [`RuleSet`] in order. Emission order is therefore "worksheet,
//! then rule", which is also the tie-break order after ranking.
//!
//! ## Failure handling
//!
//! A rule can fail by returning [`RuleError`](crate::rules::RuleError) or by
//! panicking. What happens next depends on [`FailurePolicy`]:
//!
//! ```text
//! contain: skip that (worksheet, rule) pair, record a RuleDiagnostic, keep going
//! abort:   stop the run with Error::Rule; nothing is returned
//! ```
//!
//! Panics are caught in both modes so a broken rule can never take the
//! caller down with it.

use super::metrics::{RuleDiagnostic, RuleTiming, RunMetrics, RunResult, WorksheetTraits};
use super::rank::rank;
use super::registry::RuleSet;
use super::traits::TraitScanner;
use crate::config::{Config, FailurePolicy, RankingConfig};
use crate::error::{Error, Result};
use crate::model::{WorkbookModel, Worksheet};
use crate::rules::Rule;
use crate::suggestion::Suggestion;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Evaluates a rule set against workbooks and ranks the output.
///
/// Cheap to clone; the rule set is shared.
#[derive(Debug, Clone)]
pub struct Recommender {
    rules: Arc<RuleSet>,
    scanner: TraitScanner,
    policy: FailurePolicy,
    ranking: RankingConfig,
}

impl Recommender {
    pub fn new(rules: Arc<RuleSet>, scanner: TraitScanner, policy: FailurePolicy, ranking: RankingConfig) -> Self {
        Recommender { rules, scanner, policy, ranking }
    }

    /// Build the configured rule set and runner settings from `config`.
    pub fn from_config(config: &Config) -> Self {
        Recommender::new(
            Arc::new(RuleSet::from_config(&config.rules)),
            TraitScanner::new(&config.rules),
            config.engine.failure_policy,
            config.ranking.clone(),
        )
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Ranked suggestions for every worksheet of `workbook`.
    pub fn run(&self, workbook: &WorkbookModel) -> Result<Vec<Suggestion>> {
        self.run_with_metrics(workbook).map(|result| result.suggestions)
    }

    /// Like [`run`](Self::run), also returning timings, traits and contained
    /// failures.
    pub fn run_with_metrics(&self, workbook: &WorkbookModel) -> Result<RunResult> {
        let start = Instant::now();
        let mut timings: Vec<RuleTiming> = self.rules.iter().map(|r| RuleTiming::new(r.name())).collect();
        let mut diagnostics = Vec::new();
        let mut traits = Vec::with_capacity(workbook.worksheets.len());
        let mut emitted = Vec::new();

        for ws in &workbook.worksheets {
            let ws_traits = self.scanner.scan(ws);
            debug!(worksheet = %ws.name, traits = %ws_traits, "scanned worksheet");
            traits.push(WorksheetTraits { worksheet: ws.name.clone(), traits: ws_traits });

            for (rule, timing) in self.rules.iter().zip(timings.iter_mut()) {
                let rule_start = Instant::now();
                let outcome = evaluate(rule, ws, workbook);
                timing.elapsed += rule_start.elapsed();

                match outcome {
                    Ok(suggestions) => {
                        if !suggestions.is_empty() {
                            debug!(worksheet = %ws.name, rule = rule.name(), count = suggestions.len(), "rule fired");
                        }
                        timing.emitted += suggestions.len();
                        emitted.extend(suggestions);
                    }
                    Err(message) => {
                        timing.failures += 1;
                        match self.policy {
                            FailurePolicy::Abort => {
                                return Err(Error::Rule { rule: rule.name(), message });
                            }
                            FailurePolicy::Contain => {
                                warn!(worksheet = %ws.name, rule = rule.name(), %message, "rule failed, skipping");
                                diagnostics.push(RuleDiagnostic {
                                    worksheet: ws.name.clone(),
                                    rule: rule.name(),
                                    message,
                                });
                            }
                        }
                    }
                }
            }
        }

        let emitted_count = emitted.len();
        let rank_start = Instant::now();
        let suggestions = rank(emitted, &self.ranking);
        let rank_elapsed = rank_start.elapsed();

        let metrics = RunMetrics {
            total: start.elapsed(),
            rank: rank_elapsed,
            worksheets: workbook.worksheets.len(),
            rules: timings,
            emitted: emitted_count,
            kept: suggestions.len(),
        };
        info!(
            workbook = %workbook.filename,
            worksheets = metrics.worksheets,
            emitted = metrics.emitted,
            kept = metrics.kept,
            failures = diagnostics.len(),
            elapsed = ?metrics.total,
            "generated suggestions"
        );

        Ok(RunResult { suggestions, diagnostics, traits, metrics })
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Recommender::from_config(&Config::default())
    }
}

/// Run one rule, turning errors and panics into a message.
fn evaluate(rule: &dyn Rule, ws: &Worksheet, workbook: &WorkbookModel) -> std::result::Result<Vec<Suggestion>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ws, workbook))) {
        Ok(Ok(suggestions)) => Ok(suggestions),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}
