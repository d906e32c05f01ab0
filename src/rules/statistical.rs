//! Rules driven by the number of measures: correlation, distribution and
//! multi-measure comparison.

use crate::model::{WorkbookModel, Worksheet};
use crate::rules::helpers::nth;
use crate::rules::predicates::{drawn_as, drawn_as_none_of, has_dimension, measures_at_least};
use crate::rules::{Rule, RuleError};
use crate::suggestion::Suggestion;
use crate::viz::VizType;

/// Two or more measures on anything but a scatter plot.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationOpportunity;

impl Rule for CorrelationOpportunity {
    fn name(&self) -> &'static str {
        "correlation_opportunity"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let [x, y, rest @ ..] = ws.measures.as_slice() else {
            return Ok(Vec::new());
        };
        if drawn_as(ws, VizType::ScatterPlot) {
            return Ok(Vec::new());
        }

        Ok(vec![suggestion! {
            viz: VizType::ScatterPlot,
            worksheet: ws,
            title: "Scatter Plot",
            description: "Use a scatter plot to explore correlations between measures",
            rationale: "Scatter plots are ideal for revealing relationships between continuous variables.",
            confidence: 0.80,
            mapping: {
                "x" => x,
                "y" => y,
                "size" => rest.first(),
                "color" => ws.dimensions.first(),
            },
            improvements: ["Reveals correlations", "Shows data distribution", "Identifies outliers"],
        }])
    }
}

/// Any measure can be looked at as a distribution: a histogram always, and a
/// box plot per category when there is a dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionAnalysis;

impl Rule for DistributionAnalysis {
    fn name(&self) -> &'static str {
        "distribution_analysis"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        let Some(measure) = ws.measures.first() else {
            return Ok(Vec::new());
        };
        if !drawn_as_none_of(ws, &[VizType::Histogram, VizType::BoxPlot]) {
            return Ok(Vec::new());
        }

        let mut out = vec![suggestion! {
            viz: VizType::Histogram,
            worksheet: ws,
            title: "Distribution Histogram",
            description: "Use a histogram to show data distribution",
            rationale: "Histograms reveal the shape and spread of data distributions.",
            confidence: 0.60,
            mapping: {
                "x" => measure,
                "bins" => "auto",
            },
            improvements: ["Shows data distribution", "Identifies skewness", "Reveals outliers"],
        }];

        if has_dimension(ws) {
            out.push(suggestion! {
                viz: VizType::BoxPlot,
                worksheet: ws,
                title: "Box Plot",
                description: "Use a box plot to compare distributions across categories",
                rationale: "Box plots efficiently show distribution statistics and facilitate comparisons.",
                confidence: 0.65,
                mapping: {
                    "x" => ws.dimensions.first(),
                    "y" => measure,
                },
                improvements: ["Shows quartiles and outliers", "Compact distribution summary", "Good for comparisons"],
            });
        }

        Ok(out)
    }
}

/// More than two measures: compare them side by side in a heatmap.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleMeasures;

impl Rule for MultipleMeasures {
    fn name(&self) -> &'static str {
        "multiple_measures"
    }

    fn evaluate(&self, ws: &Worksheet, _workbook: &WorkbookModel) -> Result<Vec<Suggestion>, RuleError> {
        if !measures_at_least::<3>(ws) {
            return Ok(Vec::new());
        }

        Ok(vec![suggestion! {
            viz: VizType::Heatmap,
            worksheet: ws,
            title: "Measures Heatmap",
            description: "Use a heatmap to compare multiple measures across dimensions",
            rationale: "Heatmaps efficiently display patterns in multi-dimensional data.",
            confidence: 0.70,
            mapping: {
                "x" => nth(&ws.dimensions, 0),
                "y" => ws.measures.clone(),
                "color" => "value",
            },
            improvements: ["Handles many measures", "Shows patterns visually", "Compact representation"],
        }])
    }
}
