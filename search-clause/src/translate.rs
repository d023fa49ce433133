//! Translation between clause lists and Lucene query strings.

use crate::clause::{Negation, SearchClause};
use crate::errors::{ensure_supported, QueryError};
use crate::escape::unescape_wildcard_pattern;
use crate::fields::GENERIC_DEFAULT_FIELD;
use crate::parser;
use crate::query::{BoolClause, LeafKind, Node, Occur};
use indexmap::IndexMap;
use log::{debug, warn};

/// Combines clauses into one query string.
///
/// Clauses on the same field are OR-ed together, so one of them has to match;
/// the per-field groups are all required:
/// `+((+f1:a) (+f1:b)) +((-f2:c))`.
pub fn list_to_query(clauses: &[SearchClause]) -> Result<String, QueryError> {
    if clauses.is_empty() {
        return Ok(String::new());
    }

    let mut by_field: IndexMap<&str, Vec<&SearchClause>> = IndexMap::new();
    for (idx, clause) in clauses.iter().enumerate() {
        if clause.field_name().is_empty() {
            return Err(QueryError::InvalidClause(format!(
                "clause {} ({}) has an empty field name",
                idx + 1,
                clause
            )));
        }
        by_field.entry(clause.field_name()).or_default().push(clause);
    }

    let groups: Vec<String> = by_field
        .values()
        .map(|group| {
            let members: Vec<String> = group.iter().map(|c| c.to_query_string()).collect();
            format!("({})", members.join(") ("))
        })
        .collect();
    let query = format!("+({})", groups.join(") +("));

    debug!(
        "Built query from {} clauses on {} fields: {}",
        clauses.len(),
        by_field.len(),
        query
    );
    Ok(query)
}

/// [`parse_query_string`] with the generic default field.
pub fn parse_query_string_default(query: &str) -> Result<Vec<SearchClause>, QueryError> {
    parse_query_string(query, GENERIC_DEFAULT_FIELD)
}

/// Parses a query string back into clauses.
///
/// Only the shape produced by [`list_to_query`] (plus single clauses and flat
/// lists of required/excluded clauses) is supported; anything else fails with
/// [`QueryError::NotSupported`] so the caller can fall back to editing the raw
/// string. Invalid syntax fails with [`QueryError::Syntax`].
pub fn parse_query_string(
    query: &str,
    default_field: &str,
) -> Result<Vec<SearchClause>, QueryError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let node = parser::parse(query, default_field)?;
    let result = clauses_from_node(node);
    match &result {
        Ok(clauses) => debug!("Parsed {} clauses from query: {}", clauses.len(), query),
        Err(e) => warn!("Query cannot be edited as clauses: {}: {}", query, e),
    }
    result
}

/// Checks the syntax of `query` without requiring a clause-compatible shape.
pub fn validate_query_string(query: &str, default_field: &str) -> Result<(), QueryError> {
    if query.trim().is_empty() {
        return Ok(());
    }
    parser::parse(query, default_field).map(|_| ())
}

fn clauses_from_node(node: Node) -> Result<Vec<SearchClause>, QueryError> {
    let outer = match node {
        Node::Group(clauses) => clauses,
        single => return Ok(vec![clause_from_bool(BoolClause::new(Occur::Must, single))?]),
    };

    let mut result = Vec::new();
    for bool_clause in outer {
        match bool_clause.node {
            Node::Group(inner) => {
                ensure_supported(bool_clause.occur == Occur::Must, || {
                    "For nested bool queries the first level only supports MUST".to_string()
                })?;
                result.extend(unpack_inner_group(inner)?);
            }
            _ => result.push(clause_from_bool(bool_clause)?),
        }
    }
    Ok(result)
}

fn unpack_inner_group(members: Vec<BoolClause>) -> Result<Vec<SearchClause>, QueryError> {
    let mut result = Vec::with_capacity(members.len());

    for member in members {
        match member.node {
            Node::Group(mut inner) => {
                ensure_supported(member.occur == Occur::Should, || {
                    format!(
                        "For nested bool require OR for the second level, offending clause: {}",
                        Node::Group(inner.clone())
                    )
                })?;
                ensure_supported(inner.len() == 1, || {
                    format!(
                        "Inner bool query must have one clause, found {}: {}",
                        inner.len(),
                        Node::Group(inner.clone())
                    )
                })?;
                if let Some(single) = inner.pop() {
                    result.push(clause_from_bool(single)?);
                }
            }
            _ => result.push(clause_from_bool(member)?),
        }
    }

    if let Some(first) = result.first() {
        let field_name = first.field_name();
        for clause in &result {
            ensure_supported(clause.field_name() == field_name, || {
                format!(
                    "Nested clauses must all apply to the same field, found: {} and {}",
                    clause.field_name(),
                    field_name
                )
            })?;
        }
    }

    Ok(result)
}

/// Converts a single boolean clause with a leaf query into a search clause.
pub fn clause_from_bool(bool_clause: BoolClause) -> Result<SearchClause, QueryError> {
    let negation = Negation::from_occur(bool_clause.occur).ok_or_else(|| {
        QueryError::NotSupported(format!(
            "unsupported occur value: {}",
            bool_clause.occur
        ))
    })?;

    let leaf = match bool_clause.node {
        Node::Leaf(leaf) => leaf,
        other => {
            return Err(QueryError::NotSupported(format!(
                "unsupported query type: {} query {}",
                other.kind_name(),
                other
            )))
        }
    };

    let field = leaf.field.clone();
    let clause = match leaf.kind {
        LeafKind::Term(ref text) => SearchClause::with_term(negation, field, text.clone(), true),
        LeafKind::Wildcard(ref pattern) => {
            let term = unescape_wildcard_pattern(pattern).ok_or_else(|| {
                QueryError::NotSupported(format!(
                    "wildcard pattern mixes literal and wildcard characters: {}",
                    leaf
                ))
            })?;
            SearchClause::with_term(negation, field, term, false)
        }
        LeafKind::Prefix(ref prefix) => {
            ensure_supported(!prefix.contains(['*', '?']), || {
                format!(
                    "prefix mixes literal and wildcard characters: {}",
                    leaf
                )
            })?;
            SearchClause::with_term(negation, field, format!("{}*", prefix), false)
        }
        LeafKind::Range {
            ref lower,
            ref upper,
            lower_inclusive,
            upper_inclusive,
        } => {
            ensure_supported(lower_inclusive && upper_inclusive, || {
                format!("only inclusive ranges are supported: {}", leaf)
            })?;
            match (lower, upper) {
                (Some(lower), Some(upper)) => {
                    SearchClause::with_range(negation, field, lower.clone(), upper.clone(), false)
                }
                _ => {
                    return Err(QueryError::NotSupported(format!(
                        "open-ended ranges are not supported: {}",
                        leaf
                    )))
                }
            }
        }
        ref other => {
            return Err(QueryError::NotSupported(format!(
                "unsupported query type: {} query {}",
                other.kind_name(),
                leaf
            )))
        }
    };
    Ok(clause)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut clauses: Vec<SearchClause>) -> Vec<SearchClause> {
        clauses.sort_by(|a, b| {
            a.field_name()
                .cmp(b.field_name())
                .then_with(|| a.term1().cmp(b.term1()))
                .then_with(|| a.term2().cmp(b.term2()))
        });
        clauses
    }

    #[test]
    fn test_empty() {
        assert!(parse_query_string_default("").unwrap().is_empty());
        assert!(parse_query_string_default("   ").unwrap().is_empty());
        assert_eq!(list_to_query(&[]).unwrap(), "");
    }

    #[test]
    fn test_list_to_query_grouping() {
        let clauses = vec![
            SearchClause::with_term(Negation::Is, "field1", "MAJOR", false),
            SearchClause::with_term(Negation::Is, "field2", "prod:*", false),
            SearchClause::with_term(Negation::IsNot, "field1", "MINOR", false),
        ];
        assert_eq!(
            list_to_query(&clauses).unwrap(),
            r"+((+field1:MAJOR) (-field1:MINOR)) +((+field2:prod\:*))"
        );
    }

    #[test]
    fn test_list_to_query_rejects_empty_field() {
        let clauses = vec![
            SearchClause::with_term(Negation::Is, "pv", "a", false),
            SearchClause::with_term(Negation::Is, "", "b", false),
        ];
        let err = list_to_query(&clauses).unwrap_err();
        assert!(matches!(err, QueryError::InvalidClause(_)));
        assert!(err.to_string().contains("clause 2"));
    }

    #[test]
    fn test_from_term() {
        let clauses = parse_query_string_default("testField:testTerm").unwrap();
        assert_eq!(
            clauses,
            vec![SearchClause::with_term(Negation::Is, "testField", "testTerm", true)]
        );
        assert!(clauses[0].wildcard_literal());
    }

    #[test]
    fn test_from_range() {
        let clauses = parse_query_string_default(r#"+testField:["*" TO "10"]"#).unwrap();
        assert_eq!(
            clauses,
            vec![SearchClause::with_range(Negation::Is, "testField", "*", "10", false)]
        );
    }

    #[test]
    fn test_from_prefix_and_wildcard() {
        let reference = SearchClause::with_term(Negation::Is, "testField", "something*", false);

        let clauses = parse_query_string_default("testField:something*").unwrap();
        assert_eq!(clauses, vec![reference.clone()]);
        assert_eq!(clauses[0].to_query_string(), "+testField:something*");

        let clauses = parse_query_string_default("testField:some?hing*").unwrap();
        assert_eq!(
            clauses,
            vec![SearchClause::with_term(Negation::Is, "testField", "some?hing*", false)]
        );

        let literal = SearchClause::with_term(Negation::Is, "testField", "something*", true);
        assert_ne!(literal, reference);
    }

    #[test]
    fn test_flat_required_clauses() {
        let clauses = parse_query_string_default("+pv:a -severity:OK").unwrap();
        assert_eq!(
            clauses,
            vec![
                SearchClause::with_term(Negation::Is, "pv", "a", true),
                SearchClause::with_term(Negation::IsNot, "severity", "OK", true),
            ]
        );
    }

    #[test]
    fn test_default_field() {
        // `SR` is taken as field name
        let clauses = parse_query_string("SR:RF*", "pv").unwrap();
        assert_eq!(clauses[0].field_name(), "SR");

        let clauses = parse_query_string(r"SR\:RF*", "pv").unwrap();
        assert_eq!(
            clauses,
            vec![SearchClause::with_term(Negation::Is, "pv", "SR:RF*", false)]
        );
    }

    #[test]
    fn test_round_trip() {
        let reference = vec![
            SearchClause::with_range(
                Negation::Is,
                "datefield",
                "2021-05-17 00:00:00.000",
                "2021-06-18 00:00:00.000",
                false,
            ),
            SearchClause::with_term(Negation::Is, "field1", "MAJOR", false),
            SearchClause::with_term(Negation::Is, "field1", "MINOR", false),
            SearchClause::with_term(Negation::Is, "field2", "prod:*", false),
            SearchClause::with_term(Negation::IsNot, "field2", "test:*", false),
        ];

        let query = list_to_query(&reference).unwrap();
        let reconverted = sorted(parse_query_string_default(&query).unwrap());

        assert_eq!(reconverted.len(), reference.len());
        for (expected, actual) in reference.iter().zip(&reconverted) {
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn test_parsing_errors() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert!(parse_query_string_default("+(field: something")
            .unwrap_err()
            .is_syntax());
        assert!(parse_query_string_default("-(+field: something)")
            .unwrap_err()
            .is_not_supported());
        assert!(parse_query_string_default("#(field: something)")
            .unwrap_err()
            .is_not_supported());
        assert!(
            parse_query_string_default("(field: something) (field: something else)")
                .unwrap_err()
                .is_not_supported()
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        let err = parse_query_string_default("+(+f1:a +f2:b)").unwrap_err();
        assert_eq!(
            err,
            QueryError::NotSupported(
                "Nested clauses must all apply to the same field, found: f2 and f1".to_string()
            )
        );

        let err = parse_query_string_default("+(+(f:a f:b) (+f:c))").unwrap_err();
        assert!(err.to_string().contains("second level"));

        let err = parse_query_string_default("+((f:a f:b))").unwrap_err();
        assert!(err.is_not_supported());

        // a lone parenthesised group collapses, so this is two flat clauses
        assert_eq!(parse_query_string_default("+((+f:a +f:b))").unwrap().len(), 2);

        let err = parse_query_string_default("+((+f:a +f:b) (+f:c))").unwrap_err();
        assert!(err.to_string().contains("Inner bool query must have one clause"));
    }

    #[test]
    fn test_unsupported_leaves() {
        for query in [
            "pv:abc~2",
            "pv:/ab.*/",
            "*:*",
            "pv:a^2",
            "time:[2021 TO *]",
            "time:{2021 TO 2022}",
            r"pv:a\*b*",
        ] {
            let err = parse_query_string_default(query).unwrap_err();
            assert!(err.is_not_supported(), "{} gave {}", query, err);
        }
    }

    #[test]
    fn test_validate_query_string() {
        assert!(validate_query_string("", "pv").is_ok());
        assert!(validate_query_string("(a b) (c d)", "pv").is_ok());
        assert!(validate_query_string("pv:abc~2^3", "pv").is_ok());
        assert!(validate_query_string("+(a", "pv").unwrap_err().is_syntax());
    }
}
