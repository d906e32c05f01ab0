//! Current visualization type of a worksheet, from its mark class.
//!
//! Only the first mark element is consulted and the table is fixed; shelf
//! layout and multi-mark worksheets are not taken into account.

use crate::model::DEFAULT_MARK_TYPE;
use crate::viz::VizType;
use crate::xml;
use roxmltree::Node;

/// Map a mark class to a visualization type. Classes are case-sensitive, as
/// written by the authoring tool.
pub fn viz_for_mark_class(class: &str) -> Option<VizType> {
    match class {
        "Bar" => Some(VizType::BarChart),
        "Line" => Some(VizType::LineChart),
        "Circle" => Some(VizType::ScatterPlot),
        "Square" => Some(VizType::Heatmap),
        "Pie" => Some(VizType::PieChart),
        _ => None,
    }
}

/// Class of the worksheet's first mark, `"automatic"` without one.
pub(crate) fn mark_class<'a>(worksheet: Node<'a, '_>) -> &'a str {
    xml::first(worksheet, "mark")
        .map(|mark| xml::attr_or(mark, "class", DEFAULT_MARK_TYPE))
        .unwrap_or(DEFAULT_MARK_TYPE)
}

/// Inferred type of a worksheet element; `None` stands for "unknown".
pub fn infer_viz_type(worksheet: Node<'_, '_>) -> Option<VizType> {
    viz_for_mark_class(mark_class(worksheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(markup: &str) -> Option<VizType> {
        let doc = roxmltree::Document::parse(markup).unwrap();
        infer_viz_type(doc.root_element())
    }

    #[test]
    fn fixed_table() {
        let nested = "<worksheet><table><panes><pane><mark class='Bar'/></pane></panes></table></worksheet>";
        assert_eq!(infer(nested), Some(VizType::BarChart));
        assert_eq!(infer("<worksheet><mark class='Line'/></worksheet>"), Some(VizType::LineChart));
        assert_eq!(infer("<worksheet><mark class='Circle'/></worksheet>"), Some(VizType::ScatterPlot));
        assert_eq!(infer("<worksheet><mark class='Square'/></worksheet>"), Some(VizType::Heatmap));
        assert_eq!(infer("<worksheet><mark class='Pie'/></worksheet>"), Some(VizType::PieChart));
    }

    #[test]
    fn other_marks_are_unknown() {
        assert_eq!(infer("<worksheet><mark class='Automatic'/></worksheet>"), None);
        assert_eq!(infer("<worksheet><mark class='bar'/></worksheet>"), None);
        assert_eq!(infer("<worksheet><mark/></worksheet>"), None);
        assert_eq!(infer("<worksheet/>"), None);
    }

    #[test]
    fn only_the_first_mark_counts() {
        assert_eq!(infer("<worksheet><mark class='Area'/><mark class='Bar'/></worksheet>"), None);
    }

    #[test]
    fn mark_class_defaults_to_automatic() {
        let doc = roxmltree::Document::parse("<worksheet><mark/></worksheet>").unwrap();
        assert_eq!(mark_class(doc.root_element()), "automatic");
    }
}
