//! Heuristic recommendation rules.
//!
//! Each rule looks at one worksheet (with the whole workbook available for
//! context) and returns zero or more suggestions. Rules are independent: they
//! never see each other's output, and overlapping or contradictory
//! suggestions are left as they are.
//!
//! | Rule | Fires when | Emits |
//! |---|---|---|
//! | `too_many_categories` | bar chart with an id/name/code/product-like dimension | treemap 0.75, bubble 0.65 each |
//! | `time_series_opportunity` | temporal dimension and a measure | line 0.85 (not on line), area 0.70 (2+ measures) |
//! | `correlation_opportunity` | 2+ measures, not a scatter plot | scatter 0.80 |
//! | `distribution_analysis` | a measure, not a histogram/box plot | histogram 0.60, box plot 0.65 (with a dimension) |
//! | `part_to_whole` | bar chart with exactly one dimension and one measure | pie 0.55 |
//! | `hierarchical_data` | 2+ hierarchy-like dimensions and a measure | treemap 0.75 |
//! | `multiple_measures` | 3+ measures | heatmap 0.70 |
//! | `geographic_data` | geo-like dimension and a measure | bubble 0.60 |
//! | `performance_comparison` | performance-like measure, a dimension, not a bar chart | bar 0.75 |
//!
//! Keyword checks are case-insensitive substring tests over field names.

use crate::config::RulesConfig;
use crate::model::{WorkbookModel, Worksheet};
use crate::suggestion::Suggestion;
use thiserror::Error;

pub(crate) mod categories;
pub(crate) mod comparison;
pub(crate) mod composition;
pub(crate) mod geographic;
pub(crate) mod helpers;
pub(crate) mod predicates;
pub(crate) mod statistical;
pub(crate) mod temporal;


pub use categories::{HierarchicalData, TooManyCategories};
pub use comparison::PerformanceComparison;
pub use composition::PartToWhole;
pub use geographic::GeographicData;
pub use statistical::{CorrelationOpportunity, DistributionAnalysis, MultipleMeasures};
pub use temporal::TimeSeriesOpportunity;

/// A rule failed to evaluate a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleError(pub String);

/// A recommendation rule.
///
/// Implementations must not mutate anything; the same inputs always give the
/// same suggestions (up to their generated ids).
pub trait Rule: Send + Sync {
    /// Stable identifier, also the rule's key in the configuration.
    fn name(&self) -> &'static str;

    fn evaluate(&self, worksheet: &Worksheet, workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError>;
}

/// All nine rules in evaluation order, with keyword tables taken from
/// `config`. Disabled rules are still included; see
/// [`RuleSet`](crate::engine::RuleSet) for filtering.
pub fn get(config: &RulesConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(TooManyCategories::new(config.category_keywords())),
        Box::new(TimeSeriesOpportunity::new(config.temporal_keywords())),
        Box::new(CorrelationOpportunity),
        Box::new(DistributionAnalysis),
        Box::new(PartToWhole),
        Box::new(HierarchicalData::new(config.hierarchy_keywords())),
        Box::new(MultipleMeasures),
        Box::new(GeographicData::new(config.geo_keywords())),
        Box::new(PerformanceComparison::new(config.performance_keywords())),
    ]
}
