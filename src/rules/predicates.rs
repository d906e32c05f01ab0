use crate::model::Worksheet;
use crate::viz::VizType;

/// Returns true when the worksheet has at least one measure.
pub fn has_measure(ws: &Worksheet) -> bool {
    !ws.measures.is_empty()
}

/// Returns true when the worksheet has at least one dimension.
pub fn has_dimension(ws: &Worksheet) -> bool {
    !ws.dimensions.is_empty()
}

/// Returns true when the worksheet has at least `MIN` measures.
pub fn measures_at_least<const MIN: usize>(ws: &Worksheet) -> bool {
    ws.measures.len() >= MIN
}

/// Returns true when the worksheet is currently drawn as `viz`.
pub fn drawn_as(ws: &Worksheet, viz: VizType) -> bool {
    ws.is(viz)
}

/// Returns true when the worksheet is drawn as none of `vizzes`. An unknown
/// current type counts as none of them.
pub fn drawn_as_none_of(ws: &Worksheet, vizzes: &[VizType]) -> bool {
    !vizzes.iter().any(|&v| ws.is(v))
}
