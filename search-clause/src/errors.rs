/// Error types for translating between clause lists and query strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query string is not valid Lucene classic syntax.
    /// `position` is the character offset (0-based) where parsing failed.
    Syntax { position: usize, message: String },
    /// The query is valid but cannot be represented as a list of clauses.
    NotSupported(String),
    /// A clause cannot be serialized, e.g. it has no field name.
    InvalidClause(String),
}

impl QueryError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        QueryError::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, QueryError::Syntax { .. })
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, QueryError::NotSupported(_))
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Syntax { position, message } => {
                write!(f, "Syntax error at column {}: {}", position + 1, message)
            }
            QueryError::NotSupported(msg) => write!(f, "Query not supported: {}", msg),
            QueryError::InvalidClause(msg) => write!(f, "Invalid clause: {}", msg),
        }
    }
}

impl std::error::Error for QueryError {}

/// Fails with [`QueryError::NotSupported`] unless `cond` holds.
pub(crate) fn ensure_supported(cond: bool, msg: impl FnOnce() -> String) -> Result<(), QueryError> {
    if cond {
        Ok(())
    } else {
        Err(QueryError::NotSupported(msg()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::syntax(17, "Encountered \"<EOF>\"");
        assert_eq!(
            format!("{}", err),
            "Syntax error at column 18: Encountered \"<EOF>\""
        );

        let err = QueryError::NotSupported("unsupported occur value: SHOULD".to_string());
        assert_eq!(
            format!("{}", err),
            "Query not supported: unsupported occur value: SHOULD"
        );

        let err = QueryError::InvalidClause("empty field name".to_string());
        assert_eq!(format!("{}", err), "Invalid clause: empty field name");
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let syntax = QueryError::syntax(0, "bad");
        assert!(syntax.is_syntax());
        assert!(!syntax.is_not_supported());

        let unsupported = QueryError::NotSupported("nested".to_string());
        assert!(unsupported.is_not_supported());
        assert!(!unsupported.is_syntax());
    }

    #[test]
    fn test_ensure_supported() {
        assert!(ensure_supported(true, || "never".to_string()).is_ok());
        let err = ensure_supported(false, || "too deep".to_string()).unwrap_err();
        assert_eq!(err, QueryError::NotSupported("too deep".to_string()));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: Box<dyn std::error::Error> = QueryError::syntax(3, "bad token").into();
        assert!(error.source().is_none());
        assert!(error.to_string().contains("bad token"));
    }
}
