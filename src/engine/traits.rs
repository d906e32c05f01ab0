//! Worksheet field-trait scan.
//!
//! Before the rules run, each worksheet's field lists are classified into a
//! handful of coarse traits ("has a temporal dimension", "has several
//! measures", ...). The scan uses the same keyword tables as the rules, so a
//! trait being set means the corresponding rule family had something to look
//! at.
//!
//! Traits are diagnostic: they are reported in verbose output and logged, but
//! rules still make their own decisions from the worksheet. Like any
//! keyword heuristic the scan is approximate.

use crate::config::RulesConfig;
use crate::keywords::KeywordSet;
use crate::model::Worksheet;
use std::fmt;

bitflags::bitflags! {
    /// Coarse characteristics of a worksheet's fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldTraits: u16 {
        const HAS_MEASURE      = 1 << 0;
        const MULTI_MEASURE    = 1 << 1;
        const HAS_DIMENSION    = 1 << 2;
        const TEMPORAL         = 1 << 3;
        const HIERARCHICAL     = 1 << 4;
        const GEOGRAPHIC       = 1 << 5;
        const PERFORMANCE      = 1 << 6;
        const HIGH_CARDINALITY = 1 << 7;
    }
}

impl fmt::Display for FieldTraits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<String> = self.iter_names().map(|(name, _)| name.to_ascii_lowercase()).collect();
        f.write_str(&names.join(","))
    }
}

/// Keyword tables used by the scan.
#[derive(Debug, Clone)]
pub struct TraitScanner {
    category: KeywordSet,
    temporal: KeywordSet,
    hierarchy: KeywordSet,
    geographic: KeywordSet,
    performance: KeywordSet,
}

impl TraitScanner {
    pub fn new(config: &RulesConfig) -> Self {
        TraitScanner {
            category: config.category_keywords(),
            temporal: config.temporal_keywords(),
            hierarchy: config.hierarchy_keywords(),
            geographic: config.geo_keywords(),
            performance: config.performance_keywords(),
        }
    }

    pub fn scan(&self, ws: &Worksheet) -> FieldTraits {
        let mut traits = FieldTraits::empty();

        if !ws.measures.is_empty() {
            traits |= FieldTraits::HAS_MEASURE;
        }
        if ws.measures.len() >= 2 {
            traits |= FieldTraits::MULTI_MEASURE;
        }
        if !ws.dimensions.is_empty() {
            traits |= FieldTraits::HAS_DIMENSION;
        }
        if self.temporal.any(&ws.dimensions) {
            traits |= FieldTraits::TEMPORAL;
        }
        if self.hierarchy.filter(&ws.dimensions).len() >= 2 {
            traits |= FieldTraits::HIERARCHICAL;
        }
        if self.geographic.any(&ws.dimensions) {
            traits |= FieldTraits::GEOGRAPHIC;
        }
        if self.performance.any(&ws.measures) {
            traits |= FieldTraits::PERFORMANCE;
        }
        if self.category.any(&ws.dimensions) {
            traits |= FieldTraits::HIGH_CARDINALITY;
        }

        traits
    }
}

impl Default for TraitScanner {
    fn default() -> Self {
        TraitScanner::new(&RulesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_sets_expected_traits() {
        let ws = Worksheet::named("Sales Over Time")
            .with_dimensions(["Order Date", "Country", "City"])
            .with_measures(["Sales", "Quantity"]);
        let traits = TraitScanner::default().scan(&ws);
        assert_eq!(
            traits,
            FieldTraits::HAS_MEASURE
                | FieldTraits::MULTI_MEASURE
                | FieldTraits::HAS_DIMENSION
                | FieldTraits::TEMPORAL
                | FieldTraits::HIERARCHICAL
                | FieldTraits::GEOGRAPHIC
                | FieldTraits::PERFORMANCE
        );
    }

    #[test]
    fn empty_worksheet_has_no_traits() {
        let traits = TraitScanner::default().scan(&Worksheet::named("Blank"));
        assert!(traits.is_empty());
        assert_eq!(traits.to_string(), "-");
    }

    #[test]
    fn display_lists_lowercase_names() {
        let traits = FieldTraits::HAS_MEASURE | FieldTraits::HIGH_CARDINALITY;
        assert_eq!(traits.to_string(), "has_measure,high_cardinality");
    }
}
