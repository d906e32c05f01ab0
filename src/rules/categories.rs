//! Rules about categorical breadth and hierarchy.

use crate::keywords::KeywordSet;
use crate::model::{WorkbookModel, Worksheet};
use crate::rules::helpers::{nth, nth_or_first};
use crate::rules::predicates::{drawn_as, has_measure};
use crate::rules::{Rule, RuleError};
use crate::suggestion::Suggestion;
use crate::viz::VizType;

/// Bar charts over identifier-like dimensions ("Product Name", "Customer ID")
/// tend to have too many bars. Suggests a treemap and a bubble chart for each
/// such dimension.
#[derive(Debug, Clone)]
pub struct TooManyCategories {
    keywords: KeywordSet,
}

impl TooManyCategories {
    pub fn new(keywords: KeywordSet) -> Self {
        TooManyCategories { keywords }
    }
}

impl Rule for TooManyCategories {
    fn name(&self) -> &'static str {
        "too_many_categories"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        if !drawn_as(ws, VizType::BarChart) {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for _ in ws.dimensions.iter().filter(|d| self.keywords.matches(d)) {
            out.push(suggestion! {
                viz: VizType::Treemap,
                worksheet: ws,
                title: "Treemap",
                description: "Use a treemap to better handle large numbers of categories",
                rationale: "Bar charts become cluttered with many categories. Treemaps use space more efficiently.",
                confidence: 0.75,
                mapping: {
                    "size" => ws.measures.first(),
                    "color" => ws.dimensions.first(),
                },
                improvements: [
                    "Better space utilization",
                    "Easier to compare relative sizes",
                    "Supports hierarchical grouping",
                ],
            });
            out.push(suggestion! {
                viz: VizType::BubbleChart,
                worksheet: ws,
                title: "Bubble Chart",
                description: "Use a bubble chart to show relationships between multiple dimensions",
                rationale: "Bubble charts can encode more information than bar charts \
                            and handle many data points well.",
                confidence: 0.65,
                mapping: {
                    "x" => ws.dimensions.first(),
                    "y" => ws.measures.first(),
                    "size" => nth(&ws.measures, 1),
                },
                improvements: [
                    "Shows relationships between variables",
                    "Handles large datasets",
                    "Multiple encoding channels",
                ],
            });
        }
        Ok(out)
    }
}

/// Two or more hierarchy-like dimensions (category/subcategory,
/// country/state/city) plus a measure read well as a treemap.
#[derive(Debug, Clone)]
pub struct HierarchicalData {
    keywords: KeywordSet,
}

impl HierarchicalData {
    pub fn new(keywords: KeywordSet) -> Self {
        HierarchicalData { keywords }
    }
}

impl Rule for HierarchicalData {
    fn name(&self) -> &'static str {
        "hierarchical_data"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let levels = self.keywords.filter(&ws.dimensions);
        if levels.len() < 2 || !has_measure(ws) {
            return Ok(Vec::new());
        }

        Ok(vec![suggestion! {
            viz: VizType::Treemap,
            worksheet: ws,
            title: "Hierarchical Treemap",
            description: "Use a treemap to show hierarchical data structure",
            rationale: "Treemaps excel at showing hierarchical relationships and proportional sizing.",
            confidence: 0.75,
            mapping: {
                "hierarchy" => levels,
                "size" => ws.measures.first(),
                "color" => nth_or_first(&ws.measures, 1),
            },
            improvements: ["Shows hierarchy clearly", "Space-efficient", "Supports drill-down"],
        }])
    }
}
