//! Structured search clauses for the alarm log and their translation to and
//! from Lucene classic query strings.
//!
//! ```
//! use search_clause::{list_to_query, parse_query_string, Negation, SearchClause};
//!
//! let clauses = vec![
//!     SearchClause::with_term(Negation::Is, "severity", "MAJOR", false),
//!     SearchClause::with_term(Negation::IsNot, "pv", "SR:*", false),
//! ];
//! let query = list_to_query(&clauses).unwrap();
//! assert_eq!(query, r"+((+severity:MAJOR)) +((-pv:SR\:*))");
//! assert_eq!(parse_query_string(&query, "pv").unwrap(), clauses);
//! ```

pub mod builder;
pub mod clause;
pub mod errors;
pub mod escape;
pub mod fields;
mod lexer;
pub mod parser;
pub mod query;
pub mod time_input;
pub mod translate;

pub use builder::{BuilderStatus, QueryBuilder};
pub use clause::{MatchType, Negation, SearchClause};
pub use errors::QueryError;
pub use escape::{escape, escape_with};
pub use fields::{AlarmLogField, DEFAULT_FIELD, GENERIC_DEFAULT_FIELD};
pub use query::{BoolClause, Leaf, LeafKind, Node, Occur};
pub use time_input::convert_time_input;
pub use translate::{
    clause_from_bool, list_to_query, parse_query_string, parse_query_string_default,
    validate_query_string,
};
