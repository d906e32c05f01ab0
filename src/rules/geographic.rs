//! Geographic rule.

use crate::keywords::KeywordSet;
use crate::model::{WorkbookModel, Worksheet};
use crate::rules::helpers::nth_or_first;
use crate::rules::{Rule, RuleError};
use crate::suggestion::Suggestion;
use crate::viz::VizType;

/// Geographic dimensions (country, city, zip, latitude, ...) with a measure.
///
/// There is no map type in the closed set, so the suggestion is a bubble
/// chart keyed by the location.
#[derive(Debug, Clone)]
pub struct GeographicData {
    keywords: KeywordSet,
}

impl GeographicData {
    pub fn new(keywords: KeywordSet) -> Self {
        GeographicData { keywords }
    }
}

impl Rule for GeographicData {
    fn name(&self) -> &'static str {
        "geographic_data"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let geo = self.keywords.filter(&ws.dimensions);
        let (Some(&location), Some(measure)) = (geo.first(), ws.measures.first()) else {
            return Ok(Vec::new());
        };

        Ok(vec![suggestion! {
            viz: VizType::BubbleChart,
            worksheet: ws,
            title: "Geographic Bubble Chart",
            description: "Use a bubble chart to show geographic distribution of data",
            rationale: "Bubble charts can effectively represent geographic data when maps aren't available.",
            confidence: 0.60,
            mapping: {
                "x" => location,
                "y" => measure,
                "size" => nth_or_first(&ws.measures, 1),
            },
            improvements: ["Shows geographic patterns", "Handles multiple measures", "Easy to identify hotspots"],
        }])
    }
}
