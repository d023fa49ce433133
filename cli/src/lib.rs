pub mod config;

use search_clause::QueryError;

/// Errors that end the CLI with a specific exit code
#[derive(Debug)]
pub enum CliError {
    InvalidQuery(QueryError),
    UnsupportedQuery(QueryError),
    InvalidClauses(QueryError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidQuery(_) => 2,
            CliError::UnsupportedQuery(_) => 3,
            CliError::InvalidClauses(_) => 4,
        }
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Syntax { .. } => CliError::InvalidQuery(e),
            QueryError::NotSupported(_) => CliError::UnsupportedQuery(e),
            QueryError::InvalidClause(_) => CliError::InvalidClauses(e),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidQuery(e) => write!(f, "{}", e),
            CliError::UnsupportedQuery(e) => write!(
                f,
                "{}\n\nThe query is valid but can not be represented as a list of clauses.\nUse `sclause check` to validate it without conversion.",
                e
            ),
            CliError::InvalidClauses(e) => write!(
                f,
                "{}\n\nEvery clause needs a non-empty `field`. Run `sclause fields` to list known fields.",
                e
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidQuery(e)
            | CliError::UnsupportedQuery(e)
            | CliError::InvalidClauses(e) => Some(e),
        }
    }
}

/// Exit code for an error returned from a command; 1 for anything that is
/// not a [`CliError`].
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(1)
}
