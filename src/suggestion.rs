//! Suggestion values emitted by the rules.

use crate::error::Error;
use crate::viz::VizType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A proposed alternative visualization for one worksheet.
///
/// Created only by rule evaluation. The serialized form is a flat record with
/// `viz_type` written as its string tag; this is what the render layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub viz_type: VizType,
    pub title: String,
    pub description: String,
    pub rationale: String,
    /// Always within `0.0..=1.0`.
    pub confidence: f64,
    pub data_mapping: DataMapping,
    pub original_worksheet: String,
    pub improvements: Vec<String>,
}

impl Suggestion {
    /// Build a suggestion with a fresh id. `confidence` is clamped into
    /// `0.0..=1.0`; NaN becomes `0.0`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        viz_type: VizType,
        title: String,
        description: &str,
        rationale: &str,
        confidence: f64,
        data_mapping: DataMapping,
        original_worksheet: &str,
        improvements: &[&str],
    ) -> Self {
        Suggestion {
            id: uuid::Uuid::new_v4().to_string(),
            viz_type,
            title,
            description: description.to_string(),
            rationale: rationale.to_string(),
            confidence: clamp_confidence(confidence),
            data_mapping,
            original_worksheet: original_worksheet.to_string(),
            improvements: improvements.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Encoding role (`x`, `y`, `color`, `size`, `angle`, `hierarchy`, `bins`,
/// `stack`, ...) to field assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMapping(BTreeMap<String, MappingValue>);

impl DataMapping {
    pub fn new() -> Self {
        DataMapping(BTreeMap::new())
    }

    pub fn insert(&mut self, role: &str, value: impl Into<MappingValue>) {
        self.0.insert(role.to_string(), value.into());
    }

    pub fn get(&self, role: &str) -> Option<&MappingValue> {
        self.0.get(role)
    }

    /// The single field assigned to `role`, if any.
    pub fn field(&self, role: &str) -> Option<&str> {
        match self.0.get(role)? {
            MappingValue::Field(name) => Some(name),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a role is bound to: one field, several fields, a flag such as
/// `stack = true`, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    Field(String),
    Fields(Vec<String>),
    Flag(bool),
    Null,
}

impl fmt::Display for MappingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingValue::Field(name) => f.write_str(name),
            MappingValue::Fields(names) => write!(f, "[{}]", names.join(", ")),
            MappingValue::Flag(flag) => write!(f, "{flag}"),
            MappingValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for MappingValue {
    fn from(value: &str) -> Self {
        MappingValue::Field(value.to_string())
    }
}

impl From<String> for MappingValue {
    fn from(value: String) -> Self {
        MappingValue::Field(value)
    }
}

impl From<&String> for MappingValue {
    fn from(value: &String) -> Self {
        MappingValue::Field(value.clone())
    }
}

impl From<Option<&String>> for MappingValue {
    fn from(value: Option<&String>) -> Self {
        value.map(MappingValue::from).unwrap_or(MappingValue::Null)
    }
}

impl From<Vec<String>> for MappingValue {
    fn from(value: Vec<String>) -> Self {
        MappingValue::Fields(value)
    }
}

impl From<Vec<&String>> for MappingValue {
    fn from(value: Vec<&String>) -> Self {
        MappingValue::Fields(value.into_iter().cloned().collect())
    }
}

impl From<bool> for MappingValue {
    fn from(value: bool) -> Self {
        MappingValue::Flag(value)
    }
}

/// Output targets of the render/export layer.
///
/// The core never renders; it only validates the tag so that callers fail the
/// same way whichever layer sees a bad format first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    D3,
    VegaLite,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::D3 => "d3",
            ExportFormat::VegaLite => "vega-lite",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "d3" => Ok(ExportFormat::D3),
            "vega-lite" | "vegalite" => Ok(ExportFormat::VegaLite),
            _ => Err(Error::UnknownExportFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Suggestion {
        Suggestion::new(
            VizType::AreaChart,
            "Stacked Area Chart for Sales Over Time".to_string(),
            "Use a stacked area chart to show composition over time",
            "Area charts show both trends and part-to-whole relationships in temporal data.",
            0.7,
            mapping! {
                "x" => "Order Date",
                "y" => vec!["Sales".to_string(), "Profit".to_string()],
                "stack" => true,
                "color" => None::<&String>,
            },
            "Sales Over Time",
            &["Shows composition changes"],
        )
    }

    #[test]
    fn serialized_suggestion_rehydrates_to_an_equal_value() {
        let original = sample();
        let json = serde_json::to_string(&original).unwrap();
        let back: Suggestion = serde_json::from_str(&json).unwrap();

        assert_eq!(back, original);
        assert_eq!(back.confidence.to_bits(), original.confidence.to_bits());
    }

    #[test]
    fn serialized_form_is_flat_with_string_tag() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["viz_type"], "area_chart");
        assert_eq!(value["data_mapping"]["stack"], true);
        assert_eq!(value["data_mapping"]["color"], serde_json::Value::Null);
        assert_eq!(value["data_mapping"]["y"][1], "Profit");
    }

    #[test]
    fn rehydration_rejects_unknown_viz_tags() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["viz_type"] = "radar_chart".into();
        assert!(serde_json::from_value::<Suggestion>(value).is_err());
    }

    #[test]
    fn mapping_counts_roles() {
        let mut mapping = DataMapping::new();
        assert!(mapping.is_empty());
        mapping.insert("x", "Order Date");
        mapping.insert("y", "Sales");
        mapping.insert("x", "Ship Date");
        assert_eq!(mapping.len(), 2);
        assert!(!mapping.is_empty());
        assert_eq!(mapping.field("x"), Some("Ship Date"));
    }

    #[test]
    fn confidence_is_clamped() {
        let mut s = sample();
        s.confidence = clamp_confidence(1.7);
        assert_eq!(s.confidence, 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
    }

    #[test]
    fn export_format_tags() {
        assert_eq!("Vega-Lite".parse::<ExportFormat>().unwrap(), ExportFormat::VegaLite);
        assert_eq!("d3".parse::<ExportFormat>().unwrap().as_str(), "d3");
        assert!(matches!("png".parse::<ExportFormat>(), Err(Error::UnknownExportFormat(tag)) if tag == "png"));
    }
}
