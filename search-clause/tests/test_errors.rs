use search_clause::{
    list_to_query, parse_query_string, parse_query_string_default, validate_query_string,
    Negation, QueryError, SearchClause,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_syntax_error() {
    init_logging();
    let err = parse_query_string_default("+(field: something").unwrap_err();
    assert!(err.is_syntax());
    assert!(!err.is_not_supported());
    match err {
        QueryError::Syntax { position, message } => {
            assert_eq!(position, 18);
            assert!(message.contains("Was expecting"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_syntax_error_display() {
    let err = validate_query_string("severity:[a TO", "pv").unwrap_err();
    assert!(err.is_syntax());
    assert!(err.to_string().starts_with("Syntax error at column"));
}

#[test]
fn test_not_supported() {
    init_logging();
    for query in [
        "-(+field: something)",
        "(field: something) (field: something else)",
        "#(field: something)",
    ] {
        let err = parse_query_string_default(query).unwrap_err();
        assert!(err.is_not_supported(), "{}: {:?}", query, err);
        assert!(err.to_string().starts_with("Query not supported:"));
    }
}

#[test]
fn test_unsupported_but_valid() {
    for query in ["pv:SR* OR pv:RF*", "pv:/SR.*/", "pv:abc~1", "*:*"] {
        assert!(validate_query_string(query, "pv").is_ok());
        assert!(parse_query_string(query, "pv").unwrap_err().is_not_supported());
    }
}

#[test]
fn test_should_occur_message() {
    let err = parse_query_string_default("a b").unwrap_err();
    assert_eq!(
        err,
        QueryError::NotSupported("unsupported occur value: SHOULD".to_string())
    );
}

#[test]
fn test_invalid_clause() {
    let err = list_to_query(&[SearchClause::with_term(Negation::Is, "", "x", false)]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidClause(_)));
    assert!(!err.is_syntax());
    assert!(!err.is_not_supported());
}

#[test]
fn test_deep_nesting_is_an_error() {
    let query = format!("{}pv:a{}", "(".repeat(10_000), ")".repeat(10_000));

    let err = parse_query_string(&query, "pv").unwrap_err();
    assert!(err.is_syntax());
    assert!(err.to_string().contains("nested too deeply"));
    assert!(validate_query_string(&query, "pv").unwrap_err().is_syntax());
}
