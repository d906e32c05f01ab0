//! Public entry points.
//!
//! [`VizMorph`] bundles a configuration, the rule engine built from it and a
//! shared store. The free functions at the bottom of this module run against
//! a process-wide default instance, for callers that do not need custom
//! configuration.
//!
//! # Example
//! ```no_run
//! use vizmorph::{VizMorph, Config};
//!
//! let service = VizMorph::new(Config::default());
//! let workbook = service.parse_workbook(std::path::Path::new("Superstore.twbx"))?;
//! for suggestion in service.generate_suggestions(&workbook)? {
//!     println!("{:.2} {}", suggestion.confidence, suggestion.title);
//! }
//! # Ok::<(), vizmorph::Error>(())
//! ```

use crate::config::Config;
use crate::document::{self, WorkbookSource};
use crate::engine::{Recommender, RuleDiagnostic, RunMetrics, WorksheetTraits};
use crate::error::Result;
use crate::mapper::map_workbook;
use crate::model::WorkbookModel;
use crate::store::SuggestionStore;
use crate::suggestion::Suggestion;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

static DEFAULT_SERVICE: Lazy<VizMorph> = Lazy::new(VizMorph::default);

/// Suggestions plus what the engine observed while producing them.
///
/// Returned by [`VizMorph::generate_suggestions_verbose`].
#[derive(Debug, Clone)]
pub struct SuggestionReport {
    /// Ranked, filtered and stored.
    pub suggestions: Vec<Suggestion>,
    /// Rules that failed and were skipped.
    pub diagnostics: Vec<RuleDiagnostic>,
    pub traits: Vec<WorksheetTraits>,
    pub metrics: RunMetrics,
}

/// A configured recommendation service.
///
/// Clones share the store and the compiled rule set.
#[derive(Debug, Clone)]
pub struct VizMorph {
    config: Arc<Config>,
    engine: Recommender,
    store: SuggestionStore,
}

impl VizMorph {
    pub fn new(config: Config) -> Self {
        let engine = Recommender::from_config(&config);
        let store = SuggestionStore::new(&config.store);
        VizMorph { config: Arc::new(config), engine, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &Recommender {
        &self.engine
    }

    pub fn store(&self) -> &SuggestionStore {
        &self.store
    }

    /// Read, parse and map a workbook, then store it.
    ///
    /// Any failure aborts the whole call and nothing is stored.
    pub fn parse_workbook(&self, source: impl Into<WorkbookSource>) -> Result<Arc<WorkbookModel>> {
        let source = source.into();
        let start = Instant::now();
        match self.parse_source(&source) {
            Ok(model) => {
                info!(
                    workbook_id = %model.id,
                    filename = %model.filename,
                    worksheets = model.worksheets.len(),
                    datasources = model.datasources.len(),
                    elapsed = ?start.elapsed(),
                    "parsed workbook"
                );
                Ok(self.store.put_workbook(model))
            }
            Err(err) => {
                error!(filename = %source.filename(), %err, "failed to parse workbook");
                Err(err)
            }
        }
    }

    fn parse_source(&self, source: &WorkbookSource) -> Result<WorkbookModel> {
        let raw = document::extract(source, &self.config.limits)?;
        let doc = raw.parse()?;
        Ok(map_workbook(&doc, &raw.filename, &self.config.mapping))
    }

    /// A previously parsed workbook, unless it has been evicted.
    pub fn get_workbook_data(&self, id: &str) -> Option<Arc<WorkbookModel>> {
        self.store.get_workbook(id)
    }

    /// Ranked suggestions for every worksheet of `workbook`. The returned
    /// suggestions are also stored for [`get_suggestion`](Self::get_suggestion).
    pub fn generate_suggestions(&self, workbook: &WorkbookModel) -> Result<Vec<Suggestion>> {
        self.generate_suggestions_verbose(workbook).map(|report| report.suggestions)
    }

    pub fn generate_suggestions_verbose(&self, workbook: &WorkbookModel) -> Result<SuggestionReport> {
        let run = self.engine.run_with_metrics(workbook)?;
        self.store.put_suggestions(&run.suggestions);
        Ok(SuggestionReport {
            suggestions: run.suggestions,
            diagnostics: run.diagnostics,
            traits: run.traits,
            metrics: run.metrics,
        })
    }

    pub fn get_suggestion(&self, id: &str) -> Option<Suggestion> {
        self.store.get_suggestion(id)
    }
}

impl Default for VizMorph {
    fn default() -> Self {
        VizMorph::new(Config::default())
    }
}

/// Parse a workbook with the default configuration.
pub fn parse_workbook(source: impl Into<WorkbookSource>) -> Result<Arc<WorkbookModel>> {
    DEFAULT_SERVICE.parse_workbook(source)
}

pub fn get_workbook_data(id: &str) -> Option<Arc<WorkbookModel>> {
    DEFAULT_SERVICE.get_workbook_data(id)
}

/// Generate suggestions with the default configuration.
pub fn generate_suggestions(workbook: &WorkbookModel) -> Result<Vec<Suggestion>> {
    DEFAULT_SERVICE.generate_suggestions(workbook)
}

pub fn get_suggestion(id: &str) -> Option<Suggestion> {
    DEFAULT_SERVICE.get_suggestion(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::{RankingConfig, RuleConfig};
    use crate::viz::VizType;

    const WORKBOOK: &str = r#"<?xml version='1.0' encoding='utf-8' ?>
<workbook name="Superstore" version="18.1">
  <worksheets>
    <worksheet name="Sales Over Time">
      <table>
        <view>
          <datasource-dependencies datasource="orders">
            <column name="[Order Date]" role="dimension" datatype="date"/>
            <column name="[Category]" role="dimension" datatype="string"/>
            <column name="[Sales]" role="measure" datatype="real"/>
            <column name="[Profit]" role="measure" datatype="real"/>
          </datasource-dependencies>
        </view>
        <panes><pane><mark class="Bar"/></pane></panes>
      </table>
    </worksheet>
  </worksheets>
</workbook>"#;

    fn source() -> WorkbookSource {
        WorkbookSource::bytes("Superstore.twb", WORKBOOK)
    }

    #[test]
    fn parse_then_lookup() {
        let service = VizMorph::default();
        let model = service.parse_workbook(source()).unwrap();
        assert_eq!(model.summary.name, "Superstore");
        let fetched = service.get_workbook_data(&model.id).unwrap();
        assert!(Arc::ptr_eq(&model, &fetched));
        assert!(service.get_workbook_data("nope").is_none());
    }

    #[test]
    fn markup_under_any_name_parses() {
        let service = VizMorph::default();
        let model = service.parse_workbook(WorkbookSource::bytes("workbook.xml", WORKBOOK)).unwrap();
        assert_eq!(model.filename, "workbook.xml");
        assert_eq!(model.summary.worksheet_count, 1);
    }

    #[test]
    fn engine_follows_the_service_config() {
        let mut config = Config::default();
        config.rules.geographic_data = RuleConfig::disabled();
        let service = VizMorph::new(config);
        assert_eq!(service.engine().rules().len(), 8);
        assert!(!service.engine().rules().names().contains(&"geographic_data"));
        assert!(!service.config().rules.geographic_data.enabled);
    }

    #[test]
    fn failed_parse_stores_nothing() {
        let service = VizMorph::default();
        let err = service.parse_workbook(WorkbookSource::bytes("broken.twb", "<workbook>")).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
        assert_eq!(service.store().stats().workbooks, 0);
    }

    #[test]
    fn generated_suggestions_are_retrievable() {
        let service = VizMorph::default();
        let model = service.parse_workbook(source()).unwrap();
        let suggestions = service.generate_suggestions(&model).unwrap();

        assert_eq!(suggestions[0].viz_type, VizType::LineChart);
        assert_eq!(suggestions[0].confidence, 0.85);
        for s in &suggestions {
            assert_eq!(service.get_suggestion(&s.id).as_ref(), Some(s));
        }
    }

    #[test]
    fn configuration_shapes_the_output() {
        let mut config = Config::default();
        config.rules.time_series_opportunity = RuleConfig::disabled();
        config.ranking = RankingConfig { min_confidence: 0.7, max_suggestions: Some(1) };
        let service = VizMorph::new(config);

        let model = service.parse_workbook(source()).unwrap();
        let report = service.generate_suggestions_verbose(&model).unwrap();
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].viz_type, VizType::ScatterPlot);
        assert!(report.metrics.emitted > report.metrics.kept);
        assert_eq!(report.traits[0].worksheet, "Sales Over Time");
        assert_eq!(service.store().stats().suggestions, 1);
    }

    #[test]
    fn free_functions_share_one_default_service() {
        let model = parse_workbook(source()).unwrap();
        assert!(get_workbook_data(&model.id).is_some());
        let suggestions = generate_suggestions(&model).unwrap();
        assert!(get_suggestion(&suggestions[0].id).is_some());
    }
}
