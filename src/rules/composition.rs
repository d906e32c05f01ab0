//! Part-to-whole rule.

use crate::model::{WorkbookModel, Worksheet};
use crate::rules::predicates::drawn_as;
use crate::rules::{Rule, RuleError};
use crate::suggestion::Suggestion;
use crate::viz::VizType;

/// A bar chart of a single measure split by a single dimension is a
/// composition; a pie chart says so more directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartToWhole;

impl Rule for PartToWhole {
    fn name(&self) -> &'static str {
        "part_to_whole"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let ([dimension], [measure]) = (ws.dimensions.as_slice(), ws.measures.as_slice()) else {
            return Ok(Vec::new());
        };
        if !drawn_as(ws, VizType::BarChart) {
            return Ok(Vec::new());
        }

        Ok(vec![suggestion! {
            viz: VizType::PieChart,
            worksheet: ws,
            title: "Pie Chart",
            description: "Use a pie chart to emphasize part-to-whole relationships",
            rationale: "Pie charts make proportional relationships more apparent than bar charts.",
            confidence: 0.55,
            mapping: {
                "angle" => measure,
                "color" => dimension,
            },
            improvements: ["Emphasizes proportions", "Shows parts of a whole", "Intuitive for percentages"],
        }])
    }
}
