//! Visualization recommendations for Tableau workbooks.
//!
//! A workbook (`.twb` markup or a `.twbx` package) is read into a normalized
//! [`WorkbookModel`]: worksheets with their current chart type, shelves,
//! filters and dimension/measure fields, plus datasources. A fixed set of
//! heuristic rules then looks at each worksheet and proposes alternative
//! charts, each with a confidence, a rationale and a field-to-encoding
//! mapping. Suggestions come back ranked by confidence.
//!
//! ```text
//! source ─ document::extract ─ parse_markup ─ map_workbook ─▶ WorkbookModel
//!                                                               │
//!                                        engine::Recommender ◀──┘
//!                                                 │
//!                                                 ▼
//!                                      ranked Vec<Suggestion>
//! ```
//!
//! [`VizMorph`] ties the pieces together with a [`Config`] and a bounded
//! in-memory store; the free functions [`parse_workbook`],
//! [`generate_suggestions`] and friends use a default instance.

#[macro_use]
mod macros;
mod api;
pub mod config;
mod document;
pub mod engine;
mod error;
mod infer;
pub mod keywords;
mod mapper;
mod model;
pub mod rules;
mod store;
mod suggestion;
mod viz;
mod xml;

pub use api::{
    SuggestionReport, VizMorph, generate_suggestions, get_suggestion, get_workbook_data, parse_workbook,
};
pub use config::{
    Config, EngineConfig, FailurePolicy, MappingConfig, RankingConfig, RuleConfig, RulesConfig, SourceLimits,
    StoreConfig,
};
pub use document::{RawDocument, WorkbookSource, extract, parse_markup};
pub use engine::{FieldTraits, Recommender, RuleDiagnostic, RuleSet, RunMetrics, RunResult};
pub use error::{Error, Result};
pub use infer::{infer_viz_type, viz_for_mark_class};
pub use keywords::KeywordSet;
pub use mapper::map_workbook;
pub use model::{
    Column, Connection, DEFAULT_FILTER_KIND, DEFAULT_MARK_TYPE, Datasource, Filter, ShelfRole, Shelves, Summary,
    WorkbookModel, Worksheet,
};
pub use rules::{Rule, RuleError};
pub use store::{StoreStats, SuggestionStore};
pub use suggestion::{DataMapping, ExportFormat, MappingValue, Suggestion};
pub use viz::{UNKNOWN_TAG, UnknownVizType, VizType};
