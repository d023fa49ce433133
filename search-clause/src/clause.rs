use crate::escape::escape;
use crate::query::Occur;
use crate::time_input::convert_time_input;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use strum_macros::{Display, EnumString};

/// Whether a clause is required or excluded.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum Negation {
    #[default]
    #[serde(rename = "is")]
    #[strum(serialize = "is")]
    Is,
    #[serde(rename = "is not")]
    #[strum(to_string = "is not", serialize = "is_not", serialize = "not")]
    IsNot,
}

impl Negation {
    /// Maps a boolean occur back to a negation; `Should` has no counterpart.
    pub fn from_occur(occur: Occur) -> Option<Negation> {
        match occur {
            Occur::Must => Some(Negation::Is),
            Occur::MustNot => Some(Negation::IsNot),
            Occur::Should => None,
        }
    }

    pub fn occur(&self) -> Occur {
        match self {
            Negation::Is => Occur::Must,
            Negation::IsNot => Occur::MustNot,
        }
    }

    /// The prefix operator in query syntax, `+` or `-`.
    pub fn to_query_string(&self) -> &'static str {
        self.occur().as_operator()
    }
}

/// How a clause's terms are edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum MatchType {
    #[strum(serialize = "Term")]
    Term,
    #[strum(serialize = "in Range")]
    Range,
    #[strum(serialize = "in Time")]
    DateRange,
}

/// One structured search condition: `field is/is not term`, or a range.
///
/// Two clauses are equal when they produce the same query string, so e.g.
/// the wildcard flag only matters for terms that contain wildcards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchClause {
    #[serde(default)]
    negation: Negation,
    #[serde(rename = "field")]
    field_name: String,
    #[serde(rename = "term", default = "default_term")]
    term1: String,
    #[serde(rename = "to", default)]
    term2: String,
    #[serde(default)]
    wildcard_literal: bool,
}

fn default_term() -> String {
    "*".to_string()
}

impl Default for SearchClause {
    fn default() -> Self {
        Self::new("")
    }
}

impl SearchClause {
    /// A clause matching anything in `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_term(Negation::Is, field, default_term(), false)
    }

    pub fn with_term(
        negation: Negation,
        field: impl Into<String>,
        term: impl Into<String>,
        wildcard_literal: bool,
    ) -> Self {
        Self::with_range(negation, field, term, "", wildcard_literal)
    }

    pub fn with_range(
        negation: Negation,
        field: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        wildcard_literal: bool,
    ) -> Self {
        Self {
            negation,
            field_name: field.into(),
            term1: from.into(),
            term2: to.into(),
            wildcard_literal,
        }
    }

    pub fn negation(&self) -> Negation {
        self.negation
    }

    pub fn set_negation(&mut self, negation: Negation) {
        self.negation = negation;
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn set_field_name(&mut self, field: impl Into<String>) {
        self.field_name = field.into();
    }

    pub fn term1(&self) -> &str {
        &self.term1
    }

    pub fn set_term1(&mut self, term: impl Into<String>) {
        self.term1 = term.into();
    }

    pub fn term2(&self) -> &str {
        &self.term2
    }

    pub fn set_term2(&mut self, term: impl Into<String>) {
        self.term2 = term.into();
    }

    pub fn wildcard_literal(&self) -> bool {
        self.wildcard_literal
    }

    pub fn set_wildcard_literal(&mut self, literal: bool) {
        self.wildcard_literal = literal;
    }

    pub fn is_range(&self) -> bool {
        !self.term2.is_empty()
    }

    pub fn match_type(&self) -> MatchType {
        if self.is_range() {
            MatchType::Range
        } else {
            MatchType::Term
        }
    }

    /// Switching to a term match drops the upper bound, switching to a range
    /// opens the upper bound if none is set.
    pub fn set_match_type(&mut self, match_type: MatchType) {
        match match_type {
            MatchType::Term => self.term2.clear(),
            MatchType::Range | MatchType::DateRange => {
                if self.term2.is_empty() {
                    self.term2 = "*".to_string();
                }
            }
        }
    }

    /// Sets both bounds from user time input, see [`convert_time_input`].
    pub fn set_date_range(&mut self, from: &str, to: &str, now: DateTime<Utc>) {
        self.term1 = convert_time_input(from, now);
        self.term2 = convert_time_input(to, now);
    }

    /// The clause as a single Lucene query clause, e.g. `+severity:MAJOR`.
    pub fn to_query_string(&self) -> String {
        let mut condition = escape(&self.term1, self.wildcard_literal);
        if self.is_range() {
            condition = format!(
                "[\"{}\" TO \"{}\"]",
                condition,
                escape(&self.term2, self.wildcard_literal)
            );
        }

        format!(
            "{}{}:{}",
            self.negation.to_query_string(),
            escape(&self.field_name, true),
            condition
        )
    }
}

impl fmt::Display for SearchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl PartialEq for SearchClause {
    fn eq(&self, other: &Self) -> bool {
        self.to_query_string() == other.to_query_string()
    }
}

impl Eq for SearchClause {}

impl Hash for SearchClause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_query_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn test_simple_query_string() {
        let clause = SearchClause::with_term(Negation::Is, "field1", "term", false);
        assert_eq!(clause.to_query_string(), "+field1:term");
        assert_eq!(clause.to_string(), "+field1:term");
    }

    #[test]
    fn test_query_with_escaping() {
        let clause = SearchClause::with_term(
            Negation::IsNot,
            "field with space",
            "wildcard*literal with space",
            true,
        );
        assert_eq!(
            clause.to_query_string(),
            r"-field\ with\ space:wildcard\*literal\ with\ space"
        );
    }

    #[test]
    fn test_field_name_always_escapes_wildcards() {
        let clause = SearchClause::with_term(Negation::Is, "f*", "a*", false);
        assert_eq!(clause.to_query_string(), r"+f\*:a*");
    }

    #[test]
    fn test_range_query_string() {
        let clause = SearchClause::with_range(
            Negation::Is,
            "datefield",
            "2021-05-17 00:00:00.000",
            "2021-06-18 00:00:00.000",
            false,
        );
        assert_eq!(
            clause.to_query_string(),
            r#"+datefield:["2021\-05\-17\ 00\:00\:00.000" TO "2021\-06\-18\ 00\:00\:00.000"]"#
        );
    }

    #[test]
    fn test_equality_is_by_query_string() {
        assert_eq!(SearchClause::default(), SearchClause::default());

        let mut clause1 = SearchClause::with_term(Negation::IsNot, "some field", "some term", true);
        let clause2 = SearchClause::with_term(Negation::IsNot, "some field", "some term", true);
        assert_eq!(clause1, clause2);

        // The wildcard flag makes no difference without wildcards in the term.
        let clause3 = SearchClause::with_term(Negation::IsNot, "some field", "some term", false);
        assert_eq!(clause1, clause3);

        clause1.set_field_name("blubb");
        assert_ne!(clause1, clause2);

        let literal = SearchClause::with_term(Negation::Is, "f", "pre*", true);
        let pattern = SearchClause::with_term(Negation::Is, "f", "pre*", false);
        assert_ne!(literal, pattern);

        let set: HashSet<SearchClause> = [clause2, clause3].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_default_clause() {
        let clause = SearchClause::new("pv");
        assert_eq!(clause.negation(), Negation::Is);
        assert_eq!(clause.term1(), "*");
        assert_eq!(clause.term2(), "");
        assert!(!clause.wildcard_literal());
        assert_eq!(clause.to_query_string(), "+pv:*");
    }

    #[test]
    fn test_negation_mapping() {
        assert_eq!(Negation::from_occur(Occur::Must), Some(Negation::Is));
        assert_eq!(Negation::from_occur(Occur::MustNot), Some(Negation::IsNot));
        assert_eq!(Negation::from_occur(Occur::Should), None);
        assert_eq!(Negation::Is.to_query_string(), "+");
        assert_eq!(Negation::IsNot.to_query_string(), "-");
        assert_eq!(Negation::IsNot.to_string(), "is not");
        assert_eq!(Negation::from_str("is not").unwrap(), Negation::IsNot);
        assert_eq!(Negation::from_str("is").unwrap(), Negation::Is);
        assert!(Negation::from_str("maybe").is_err());
    }

    #[test]
    fn test_match_type() {
        let mut clause = SearchClause::with_term(Negation::Is, "time", "2021", false);
        assert_eq!(clause.match_type(), MatchType::Term);

        clause.set_match_type(MatchType::Range);
        assert_eq!(clause.term2(), "*");
        assert_eq!(clause.match_type(), MatchType::Range);

        clause.set_term2("2022");
        clause.set_match_type(MatchType::DateRange);
        assert_eq!(clause.term2(), "2022");

        clause.set_match_type(MatchType::Term);
        assert_eq!(clause.term2(), "");
        assert_eq!(MatchType::DateRange.to_string(), "in Time");
    }

    #[test]
    fn test_set_date_range() {
        let now = Utc.with_ymd_and_hms(2021, 6, 18, 12, 0, 0).unwrap();
        let mut clause = SearchClause::new("message_time");
        clause.set_date_range("1 day", "now", now);
        assert_eq!(clause.term1(), "2021-06-17 12:00:00.000");
        assert_eq!(clause.term2(), "2021-06-18 12:00:00.000");
    }

    #[test]
    fn test_serde_defaults() {
        let clause: SearchClause =
            serde_json::from_str(r#"{"field": "severity", "term": "MAJOR"}"#).unwrap();
        assert_eq!(
            clause,
            SearchClause::with_term(Negation::Is, "severity", "MAJOR", false)
        );

        let clause: SearchClause = serde_yaml_ng::from_str(
            "negation: is not\nfield: pv\nterm: 'SR:*'\nwildcard_literal: true\n",
        )
        .unwrap();
        assert_eq!(clause.negation(), Negation::IsNot);
        assert_eq!(clause.to_query_string(), r"-pv:SR\:\*");
    }
}
