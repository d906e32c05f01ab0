//! Closed set of visualization types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The ten visualization types a suggestion can carry.
///
/// Tags are the snake_case names (`"bar_chart"`, `"scatter_plot"`, ...). Any
/// other tag is rejected at deserialization and by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizType {
    BarChart,
    LineChart,
    ScatterPlot,
    Heatmap,
    PieChart,
    AreaChart,
    Histogram,
    BoxPlot,
    Treemap,
    BubbleChart,
}

impl VizType {
    pub const ALL: [VizType; 10] = [
        VizType::BarChart,
        VizType::LineChart,
        VizType::ScatterPlot,
        VizType::Heatmap,
        VizType::PieChart,
        VizType::AreaChart,
        VizType::Histogram,
        VizType::BoxPlot,
        VizType::Treemap,
        VizType::BubbleChart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VizType::BarChart => "bar_chart",
            VizType::LineChart => "line_chart",
            VizType::ScatterPlot => "scatter_plot",
            VizType::Heatmap => "heatmap",
            VizType::PieChart => "pie_chart",
            VizType::AreaChart => "area_chart",
            VizType::Histogram => "histogram",
            VizType::BoxPlot => "box_plot",
            VizType::Treemap => "treemap",
            VizType::BubbleChart => "bubble_chart",
        }
    }
}

impl fmt::Display for VizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVizType(pub String);

impl fmt::Display for UnknownVizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown visualization type `{}`", self.0)
    }
}

impl std::error::Error for UnknownVizType {}

impl FromStr for VizType {
    type Err = UnknownVizType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VizType::ALL.into_iter().find(|v| v.as_str() == s).ok_or_else(|| UnknownVizType(s.to_string()))
    }
}

/// Tag used for a worksheet whose mark could not be mapped.
pub const UNKNOWN_TAG: &str = "unknown";

/// Serde adapter for a worksheet's current type: `None` is written as
/// `"unknown"`, every other string must be one of the ten tags.
pub(crate) mod worksheet_tag {
    use super::{UNKNOWN_TAG, VizType};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<VizType>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(VizType::as_str).unwrap_or(UNKNOWN_TAG))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<VizType>, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag == UNKNOWN_TAG {
            return Ok(None);
        }
        tag.parse::<VizType>().map(Some).map_err(serde::de::Error::custom)
    }
}
