//! Free-text search: which fields participate, and how a query string matches them.

use crate::config::EntityDescriptor;
use crate::error::AppError;
use crate::record::Record;
use regex::{Regex, RegexBuilder};

/// How a search over one entity is carried out.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchPlan<'a> {
    /// Entity has no Text fields; every record matches.
    MatchAll,
    /// A record matches when any of `fields` contains `query`, ignoring case.
    AnyTextFieldContains { fields: Vec<&'a str>, query: &'a str },
}

impl<'a> SearchPlan<'a> {
    /// Number and Date fields never take part: a query is never coerced into a numeric or date comparison.
    pub fn for_entity(entity: &'a EntityDescriptor, query: &'a str) -> Self {
        let fields = entity.search_fields();
        if fields.is_empty() {
            SearchPlan::MatchAll
        } else {
            SearchPlan::AnyTextFieldContains { fields, query }
        }
    }
}

/// Unanchored, case-insensitive literal substring match.
#[derive(Clone, Debug)]
pub struct SubstringMatcher {
    re: Regex,
}

impl SubstringMatcher {
    pub fn new(query: &str) -> Result<Self, AppError> {
        let re = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::BadRequest(format!("unusable search query: {}", e)))?;
        Ok(SubstringMatcher { re })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// True when any of `fields` holds a string containing the query.
    pub fn matches_any(&self, record: &Record, fields: &[&str]) -> bool {
        fields.iter().any(|f| {
            record
                .get(f)
                .and_then(|v| v.as_str())
                .is_some_and(|s| self.is_match(s))
        })
    }
}

/// ILIKE pattern for a literal substring: `%`, `_` and `\` lose their wildcard meaning.
pub fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Collection, FieldDescriptor};
    use crate::record::Attributes;
    use serde_json::json;

    fn entity(fields: Vec<FieldDescriptor>) -> EntityDescriptor {
        EntityDescriptor {
            name: "activities".into(),
            collection: Collection::new("activities"),
            fields,
        }
    }

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        let attrs: Attributes = pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        Record::new(attrs)
    }

    #[test]
    fn plan_uses_only_text_fields() {
        let e = entity(vec![
            FieldDescriptor::text("activityType"),
            FieldDescriptor::number("duration"),
            FieldDescriptor::date("date"),
            FieldDescriptor::text("notes"),
        ]);
        assert_eq!(
            SearchPlan::for_entity(&e, "run"),
            SearchPlan::AnyTextFieldContains {
                fields: vec!["activityType", "notes"],
                query: "run"
            }
        );
    }

    #[test]
    fn plan_without_text_fields_matches_all() {
        let e = entity(vec![FieldDescriptor::number("steps"), FieldDescriptor::date("day")]);
        assert_eq!(SearchPlan::for_entity(&e, "anything"), SearchPlan::MatchAll);
    }

    #[test]
    fn substring_is_case_insensitive_and_unanchored() {
        let r = record(&[("activityType", json!("Morning Run"))]);
        for q in ["run", "RUN", "rn", "Morning Run", "g R"] {
            let m = SubstringMatcher::new(q).unwrap();
            assert!(m.matches_any(&r, &["activityType"]), "{q} should match");
        }
        let m = SubstringMatcher::new("sprint").unwrap();
        assert!(!m.matches_any(&r, &["activityType"]));
    }

    #[test]
    fn query_metacharacters_are_literal() {
        let r = record(&[("notes", json!("felt great (again)"))]);
        assert!(SubstringMatcher::new("(again)").unwrap().matches_any(&r, &["notes"]));
        assert!(!SubstringMatcher::new(".*").unwrap().matches_any(&r, &["notes"]));
    }

    #[test]
    fn numbers_do_not_match_through_non_listed_fields() {
        let r = record(&[("activityType", json!("Swim")), ("duration", json!(30))]);
        let m = SubstringMatcher::new("30").unwrap();
        assert!(!m.matches_any(&r, &["activityType"]));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("run"), "%run%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
