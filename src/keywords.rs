//! Keyword tables for the lexical field heuristics.
//!
//! A [`KeywordSet`] answers "does this field name contain any of these
//! tokens?". Matching is a substring test, not whole-word: `"Product Name"`
//! matches `name`, and so does `"Surname"`. False positives are accepted.
//!
//! Sets are compiled once into a single regex alternation, so a rule that
//! checks every dimension of every worksheet does not re-scan the token list
//! per field.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CATEGORY: &[&str] = &["id", "name", "code", "product"];
pub const TEMPORAL: &[&str] = &["date", "time", "year", "month", "day", "quarter"];
pub const HIERARCHY: &[&str] = &["category", "subcategory", "region", "country", "state", "city"];
pub const GEOGRAPHIC: &[&str] = &["country", "state", "city", "region", "latitude", "longitude", "zip", "postal"];
pub const PERFORMANCE: &[&str] = &["sales", "revenue", "profit", "performance", "score", "rating"];
/// Case-sensitive: `SUM(Sales)` is a measure, `Summary` is not.
pub const AGGREGATION: &[&str] = &["SUM", "AVG", "COUNT"];

/// A compiled list of substring tokens.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "KeywordList", into = "KeywordList")]
pub struct KeywordSet {
    tokens: Vec<String>,
    case_insensitive: bool,
    matcher: Option<Regex>,
}

/// Serialized form: either a bare list (case-insensitive) or a table with an
/// explicit `case_sensitive` flag.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum KeywordList {
    Plain(Vec<String>),
    Detailed {
        tokens: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
}

impl KeywordSet {
    /// Case-insensitive set.
    pub fn new<I, S>(tokens: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(tokens.into_iter().map(Into::into).collect(), true)
    }

    pub fn case_sensitive<I, S>(tokens: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(tokens.into_iter().map(Into::into).collect(), false)
    }

    /// Built-in table. Escaped literals always compile.
    pub(crate) fn builtin(tokens: &[&str], case_insensitive: bool) -> Self {
        let pattern = alternation(tokens.iter().copied());
        let matcher = match pattern {
            Some(p) => RegexBuilder::new(&p).case_insensitive(case_insensitive).build().ok(),
            None => None,
        };
        KeywordSet { tokens: tokens.iter().map(|s| s.to_string()).collect(), case_insensitive, matcher }
    }

    fn build(tokens: Vec<String>, case_insensitive: bool) -> Result<Self, regex::Error> {
        let matcher = match alternation(tokens.iter().map(String::as_str)) {
            Some(p) => Some(RegexBuilder::new(&p).case_insensitive(case_insensitive).build()?),
            None => None,
        };
        Ok(KeywordSet { tokens, case_insensitive, matcher })
    }

    /// Whether `field` contains any token.
    pub fn matches(&self, field: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| re.is_match(field))
    }

    /// Fields that contain a token, in input order.
    pub fn filter<'a>(&self, fields: &'a [String]) -> Vec<&'a String> {
        fields.iter().filter(|f| self.matches(f)).collect()
    }

    pub fn any(&self, fields: &[String]) -> bool {
        fields.iter().any(|f| self.matches(f))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

fn alternation<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<String> {
    let escaped: Vec<String> = tokens.map(regex::escape).collect();
    if escaped.is_empty() { None } else { Some(escaped.join("|")) }
}

impl fmt::Debug for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordSet")
            .field("tokens", &self.tokens)
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

impl PartialEq for KeywordSet {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens && self.case_insensitive == other.case_insensitive
    }
}

impl TryFrom<KeywordList> for KeywordSet {
    type Error = regex::Error;

    fn try_from(list: KeywordList) -> Result<Self, Self::Error> {
        match list {
            KeywordList::Plain(tokens) => KeywordSet::build(tokens, true),
            KeywordList::Detailed { tokens, case_sensitive } => KeywordSet::build(tokens, !case_sensitive),
        }
    }
}

impl From<KeywordSet> for KeywordList {
    fn from(set: KeywordSet) -> Self {
        if set.case_insensitive {
            KeywordList::Plain(set.tokens)
        } else {
            KeywordList::Detailed { tokens: set.tokens, case_sensitive: true }
        }
    }
}
