//! Performance comparison rule.

use crate::keywords::KeywordSet;
use crate::model::{WorkbookModel, Worksheet};
use crate::rules::helpers::nth;
use crate::rules::predicates::drawn_as;
use crate::rules::{Rule, RuleError};
use crate::suggestion::Suggestion;
use crate::viz::VizType;

/// Performance-like measures (sales, profit, score, ...) broken down by a
/// dimension compare best as bars.
#[derive(Debug, Clone)]
pub struct PerformanceComparison {
    keywords: KeywordSet,
}

impl PerformanceComparison {
    pub fn new(keywords: KeywordSet) -> Self {
        PerformanceComparison { keywords }
    }
}

impl Rule for PerformanceComparison {
    fn name(&self) -> &'static str {
        "performance_comparison"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let performance = self.keywords.filter(&ws.measures);
        let (Some(&measure), Some(dimension)) = (performance.first(), ws.dimensions.first()) else {
            return Ok(Vec::new());
        };
        if drawn_as(ws, VizType::BarChart) {
            return Ok(Vec::new());
        }

        Ok(vec![suggestion! {
            viz: VizType::BarChart,
            worksheet: ws,
            title: "Performance Bar Chart",
            description: "Use a bar chart for clear performance comparisons",
            rationale: "Bar charts are optimal for comparing performance metrics across categories.",
            confidence: 0.75,
            mapping: {
                "x" => dimension,
                "y" => measure,
                "color" => nth(&ws.dimensions, 1),
            },
            improvements: ["Clear comparisons", "Standard for performance", "Easy to rank"],
        }])
    }
}
