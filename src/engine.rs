//! Recommendation engine.
//!
//! The engine turns a parsed [`WorkbookModel`](crate::WorkbookModel) into a
//! ranked list of suggestions. It is split into small submodules under
//! `src/engine/`:
//!
//! ```text
//! Config.rules ── RuleSet::from_config        (registry.rs)
//!                        │
//! workbook ──────────────┼── for each worksheet (document order)
//!                        │     TraitScanner::scan         (traits.rs)
//!                        │     for each rule (fixed order)
//!                        │       evaluate, contain/abort  (runner.rs)
//!                        v
//!                 rank: sort, filter, truncate            (rank.rs)
//!                        │
//!                        v
//!          Vec<Suggestion> / RunResult                     (metrics.rs)
//! ```
//!
//! The engine holds no state between runs and never mutates the workbook;
//! storing suggestions is the caller's job (see [`VizMorph`](crate::VizMorph)).
//!
//! ## Adding rules
//!
//! New rules implement [`Rule`](crate::rules::Rule) under `src/rules/`, get a
//! slot in `rules::get` and a `[rules.<name>]` entry in
//! [`RulesConfig`](crate::config::RulesConfig). If the rule keys off a new kind
//! of field, add a [`FieldTraits`] bit so verbose output can explain it.

#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rank.rs"]
mod rank;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/runner.rs"]
mod runner;
#[path = "engine/traits.rs"]
mod traits;

pub use metrics::{RuleDiagnostic, RuleTiming, RunMetrics, RunResult, WorksheetTraits};
pub use rank::rank;
pub use registry::RuleSet;
pub use runner::Recommender;
pub use traits::{FieldTraits, TraitScanner};
