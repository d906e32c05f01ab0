//! Rule registry.
//!
//! A [`RuleSet`] is the configured, ordered list of rules a run evaluates.
//! Building it is the only place where configuration touches the rules:
//! keyword tables are baked into each rule and disabled rules are dropped,
//! so the runner never consults the configuration per worksheet.
//!
//! ## Invariants
//!
//! - Evaluation order is the fixed stock order with disabled rules removed;
//!   enabling or disabling a rule never reorders the others.
//! - Rule names are unique within a set.

use crate::config::RulesConfig;
use crate::rules::{self, Rule};
use std::fmt;

/// Ordered, immutable collection of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// The stock rules, configured and filtered by `config`.
    pub fn from_config(config: &RulesConfig) -> Self {
        let rules: Vec<Box<dyn Rule>> =
            rules::get(config).into_iter().filter(|rule| config.is_enabled(rule.name())).collect();
        tracing::debug!(rules = ?rules.iter().map(|r| r.name()).collect::<Vec<_>>(), "rule set built");
        RuleSet { rules }
    }

    /// A set of caller-supplied rules, evaluated in the given order.
    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        RuleSet { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::from_config(&RulesConfig::default())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").field("rules", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    #[test]
    fn default_set_has_all_nine_in_order() {
        let set = RuleSet::default();
        assert_eq!(set.len(), 9);
        assert_eq!(set.names().first(), Some(&"too_many_categories"));
        assert_eq!(set.names().last(), Some(&"performance_comparison"));
    }

    #[test]
    fn disabled_rules_are_dropped_without_reordering() {
        let config = RulesConfig {
            correlation_opportunity: RuleConfig::disabled(),
            part_to_whole: RuleConfig::disabled(),
            ..RulesConfig::default()
        };
        let set = RuleSet::from_config(&config);
        assert_eq!(
            set.names(),
            vec![
                "too_many_categories",
                "time_series_opportunity",
                "distribution_analysis",
                "hierarchical_data",
                "multiple_measures",
                "geographic_data",
                "performance_comparison",
            ]
        );
    }
}
