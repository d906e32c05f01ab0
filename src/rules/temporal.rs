//! Time series rule.

use crate::keywords::KeywordSet;
use crate::model::{WorkbookModel, Worksheet};
use crate::rules::helpers::nth;
use crate::rules::predicates::{drawn_as, measures_at_least};
use crate::rules::{Rule, RuleError};
use crate::suggestion::Suggestion;
use crate::viz::VizType;

/// A temporal dimension (date, month, quarter, ...) with at least one
/// measure: suggest a line chart unless it already is one, and a stacked
/// area chart when there are several measures.
#[derive(Debug, Clone)]
pub struct TimeSeriesOpportunity {
    keywords: KeywordSet,
}

impl TimeSeriesOpportunity {
    pub fn new(keywords: KeywordSet) -> Self {
        TimeSeriesOpportunity { keywords }
    }
}

impl Rule for TimeSeriesOpportunity {
    fn name(&self) -> &'static str {
        "time_series_opportunity"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let temporal = self.keywords.filter(&ws.dimensions);
        let (Some(&time_field), Some(first_measure)) = (temporal.first(), ws.measures.first()) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        if !drawn_as(ws, VizType::LineChart) {
            out.push(suggestion! {
                viz: VizType::LineChart,
                worksheet: ws,
                title: "Time Series Line Chart",
                description: "Use a line chart to show trends over time",
                rationale: "Line charts are optimal for showing temporal patterns and trends.",
                confidence: 0.85,
                mapping: {
                    "x" => time_field,
                    "y" => first_measure,
                    "color" => nth(&ws.dimensions, 1),
                },
                improvements: [
                    "Better shows temporal trends",
                    "Easier to spot patterns",
                    "Standard for time series data",
                ],
            });
        }

        if measures_at_least::<2>(ws) {
            out.push(suggestion! {
                viz: VizType::AreaChart,
                worksheet: ws,
                title: "Stacked Area Chart",
                description: "Use a stacked area chart to show composition over time",
                rationale: "Area charts show both trends and part-to-whole relationships in temporal data.",
                confidence: 0.70,
                mapping: {
                    "x" => time_field,
                    "y" => ws.measures.clone(),
                    "stack" => true,
                },
                improvements: ["Shows composition changes", "Emphasizes cumulative values", "Good for multiple series"],
            });
        }

        Ok(out)
    }
}
