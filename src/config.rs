//! Engine configuration.
//!
//! Every field has a default, and the defaults reproduce the stock rule
//! behavior exactly. A TOML file only needs to name what it overrides:
//!
//! ```toml
//! [rules.geographic_data]
//! keywords = ["country", "state", "city", "zip", "postcode"]
//!
//! [rules.part_to_whole]
//! enabled = false
//!
//! [ranking]
//! min_confidence = 0.5
//! max_suggestions = 10
//!
//! [engine]
//! failure_policy = "abort"
//! ```

use crate::error::{Error, Result};
use crate::keywords::{self, KeywordSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub mapping: MappingConfig,
    pub ranking: RankingConfig,
    pub store: StoreConfig,
    pub engine: EngineConfig,
    pub limits: SourceLimits,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config(format!("invalid TOML: {e}")))?;
        config.rules.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

/// Toggle and optional keyword override for one rule.
///
/// `keywords` is only accepted for rules that match field names; `None`
/// keeps the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordSet>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig { enabled: true, keywords: None }
    }
}

impl RuleConfig {
    pub fn disabled() -> Self {
        RuleConfig { enabled: false, keywords: None }
    }

    pub(crate) fn keywords_or(&self, builtin: &[&str]) -> KeywordSet {
        self.keywords.clone().unwrap_or_else(|| KeywordSet::builtin(builtin, true))
    }
}

/// One entry per rule, named as the rules report themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub too_many_categories: RuleConfig,
    pub time_series_opportunity: RuleConfig,
    pub correlation_opportunity: RuleConfig,
    pub distribution_analysis: RuleConfig,
    pub part_to_whole: RuleConfig,
    pub hierarchical_data: RuleConfig,
    pub multiple_measures: RuleConfig,
    pub geographic_data: RuleConfig,
    pub performance_comparison: RuleConfig,
}

impl RulesConfig {
    /// Settings for the rule reporting itself as `name`.
    pub fn get(&self, name: &str) -> Option<&RuleConfig> {
        Some(match name {
            "too_many_categories" => &self.too_many_categories,
            "time_series_opportunity" => &self.time_series_opportunity,
            "correlation_opportunity" => &self.correlation_opportunity,
            "distribution_analysis" => &self.distribution_analysis,
            "part_to_whole" => &self.part_to_whole,
            "hierarchical_data" => &self.hierarchical_data,
            "multiple_measures" => &self.multiple_measures,
            "geographic_data" => &self.geographic_data,
            "performance_comparison" => &self.performance_comparison,
            _ => return None,
        })
    }

    /// Rejects a `keywords` override on a rule that never reads one.
    pub fn validate(&self) -> Result<()> {
        let fixed = [
            ("correlation_opportunity", &self.correlation_opportunity),
            ("distribution_analysis", &self.distribution_analysis),
            ("part_to_whole", &self.part_to_whole),
            ("multiple_measures", &self.multiple_measures),
        ];
        match fixed.iter().find(|(_, rule)| rule.keywords.is_some()) {
            Some((name, _)) => Err(Error::Config(format!("rule `{name}` does not take keywords"))),
            None => Ok(()),
        }
    }

    /// Unknown names count as enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_none_or(|rule| rule.enabled)
    }

    pub(crate) fn category_keywords(&self) -> KeywordSet {
        self.too_many_categories.keywords_or(keywords::CATEGORY)
    }

    pub(crate) fn temporal_keywords(&self) -> KeywordSet {
        self.time_series_opportunity.keywords_or(keywords::TEMPORAL)
    }

    pub(crate) fn hierarchy_keywords(&self) -> KeywordSet {
        self.hierarchical_data.keywords_or(keywords::HIERARCHY)
    }

    pub(crate) fn geo_keywords(&self) -> KeywordSet {
        self.geographic_data.keywords_or(keywords::GEOGRAPHIC)
    }

    pub(crate) fn performance_keywords(&self) -> KeywordSet {
        self.performance_comparison.keywords_or(keywords::PERFORMANCE)
    }
}

/// Settings for the structural mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Tokens that mark a shelf field as a measure when the document carries
    /// no explicit roles.
    pub aggregation_tokens: KeywordSet,
}

impl Default for MappingConfig {
    fn default() -> Self {
        MappingConfig { aggregation_tokens: KeywordSet::builtin(keywords::AGGREGATION, false) }
    }
}

/// Post-ranking filters. The defaults keep every suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Suggestions strictly below this confidence are dropped.
    pub min_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_suggestions: Option<usize>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig { min_confidence: 0.0, max_suggestions: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Parsed workbooks kept before the least recently used one is evicted.
    pub capacity: usize,
    pub suggestion_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig { capacity: 100, suggestion_capacity: 10_000 }
    }
}

/// What happens when a single rule fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip the failing rule, record a diagnostic and keep the other rules'
    /// suggestions.
    #[default]
    Contain,
    /// Abort the whole run with the first rule error.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub failure_policy: FailurePolicy,
}

/// Checks applied to a source before it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLimits {
    /// Upper bound for the file and for the inner document of an archive.
    pub max_document_bytes: u64,
    /// Accepted filename suffixes, compared case-insensitively. Empty, the
    /// default, accepts any name; upload handlers opt in.
    pub allowed_extensions: Vec<String>,
}

const MAX_DOCUMENT_BYTES: u64 = 50 * 1024 * 1024;

impl Default for SourceLimits {
    fn default() -> Self {
        SourceLimits { max_document_bytes: MAX_DOCUMENT_BYTES, allowed_extensions: Vec::new() }
    }
}

impl SourceLimits {
    /// Limits for untrusted uploads: only `.twb` and `.twbx` names.
    pub fn uploads() -> Self {
        SourceLimits { allowed_extensions: vec![".twb".into(), ".twbx".into()], ..SourceLimits::default() }
    }
}
