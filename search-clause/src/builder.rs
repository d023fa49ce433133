use crate::clause::SearchClause;
use crate::errors::QueryError;
use crate::fields::DEFAULT_FIELD;
use crate::translate::{list_to_query, parse_query_string};
use log::info;
use std::fmt;

/// Outcome of the last attempt to turn a raw query into clauses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuilderStatus {
    #[default]
    Ok,
    /// The query has a syntax error.
    Invalid(String),
    /// The query is valid but cannot be shown as a clause list.
    TooComplex(String),
}

impl fmt::Display for BuilderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderStatus::Ok => write!(f, "ok"),
            BuilderStatus::Invalid(msg) => write!(f, "invalid query: {}", msg),
            BuilderStatus::TooComplex(msg) => write!(f, "query too complex to edit: {}", msg),
        }
    }
}

/// Editing state of a clause list kept in sync with a raw query string.
///
/// While editable, the clauses are the source of truth. A raw query that can
/// not be turned into clauses makes the builder read-only and the raw string
/// is used as is until a parseable query is set again.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_field: String,
    clauses: Vec<SearchClause>,
    query_string: String,
    editable: bool,
    status: BuilderStatus,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD)
    }
}

impl QueryBuilder {
    pub fn new(default_field: impl Into<String>) -> Self {
        Self {
            default_field: default_field.into(),
            clauses: Vec::new(),
            query_string: String::new(),
            editable: true,
            status: BuilderStatus::Ok,
        }
    }

    pub fn clauses(&self) -> &[SearchClause] {
        &self.clauses
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn status(&self) -> &BuilderStatus {
        &self.status
    }

    pub fn set_query_string(&mut self, query: impl Into<String>) {
        self.query_string = query.into();
        match parse_query_string(&self.query_string, &self.default_field) {
            Ok(clauses) => {
                self.clauses = clauses;
                self.editable = true;
                self.status = BuilderStatus::Ok;
            }
            Err(e) => {
                self.editable = false;
                self.status = match e {
                    QueryError::Syntax { .. } => BuilderStatus::Invalid(e.to_string()),
                    _ => BuilderStatus::TooComplex(e.to_string()),
                };
                info!("Clause editing disabled: {}", self.status);
            }
        }
    }

    /// The query to run: built from the clauses when editable, the raw string
    /// otherwise.
    pub fn query_string(&self) -> Result<String, QueryError> {
        if self.editable {
            list_to_query(&self.clauses)
        } else {
            Ok(self.query_string.clone())
        }
    }

    pub fn add_clause(&mut self) -> &mut SearchClause {
        self.clauses.push(SearchClause::new(DEFAULT_FIELD));
        let last = self.clauses.len() - 1;
        &mut self.clauses[last]
    }

    pub fn remove_clause(&mut self, idx: usize) -> Option<SearchClause> {
        (idx < self.clauses.len()).then(|| self.clauses.remove(idx))
    }

    /// Replaces the clause list; the builder becomes editable again.
    pub fn set_clauses(&mut self, clauses: Vec<SearchClause>) {
        self.clauses = clauses;
        self.editable = true;
        self.status = BuilderStatus::Ok;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Negation;

    #[test]
    fn test_editable_query() {
        let mut builder = QueryBuilder::default();
        builder.set_query_string("+severity:MAJOR -pv:SR*");
        assert!(builder.is_editable());
        assert_eq!(builder.status(), &BuilderStatus::Ok);
        assert_eq!(builder.clauses().len(), 2);
        assert_eq!(
            builder.query_string().unwrap(),
            "+((+severity:MAJOR)) +((-pv:SR*))"
        );
    }

    #[test]
    fn test_invalid_query_keeps_clauses() {
        let mut builder = QueryBuilder::default();
        builder.set_query_string("+severity:MAJOR");
        builder.set_query_string("+(severity: MAJOR");

        assert!(!builder.is_editable());
        assert!(matches!(builder.status(), BuilderStatus::Invalid(_)));
        assert_eq!(builder.clauses().len(), 1);
        assert_eq!(builder.query_string().unwrap(), "+(severity: MAJOR");
    }

    #[test]
    fn test_too_complex_query() {
        let mut builder = QueryBuilder::default();
        builder.set_query_string("severity:MAJOR OR severity:MINOR");
        assert!(!builder.is_editable());
        assert!(matches!(builder.status(), BuilderStatus::TooComplex(_)));
        assert_eq!(
            builder.query_string().unwrap(),
            "severity:MAJOR OR severity:MINOR"
        );

        builder.set_clauses(vec![SearchClause::with_term(
            Negation::Is,
            "severity",
            "MINOR",
            false,
        )]);
        assert!(builder.is_editable());
        assert_eq!(builder.query_string().unwrap(), "+((+severity:MINOR))");
    }

    #[test]
    fn test_add_and_remove_clauses() {
        let mut builder = QueryBuilder::default();
        builder.add_clause().set_term1("SR:RF*");
        builder.add_clause();
        assert_eq!(builder.clauses().len(), 2);
        assert_eq!(builder.clauses()[1].to_query_string(), "+pv:*");

        let removed = builder.remove_clause(0).unwrap();
        assert_eq!(removed.term1(), "SR:RF*");
        assert!(builder.remove_clause(5).is_none());
        assert_eq!(builder.query_string().unwrap(), "+((+pv:*))");
    }
}
