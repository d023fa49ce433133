use crate::argparse::CheckArgs;
use anyhow::Result;
use search_clause::{parse_query_string, validate_query_string};
use search_clause_cli::config::Config;
use search_clause_cli::CliError;

/// Validates the syntax only; a valid query that has no clause form still passes.
pub fn handle_check_command(args: CheckArgs, config: &Config) -> Result<()> {
    let default_field = args.default_field.as_deref().unwrap_or(&config.default_field);
    validate_query_string(&args.query, default_field).map_err(CliError::from)?;

    match parse_query_string(&args.query, default_field) {
        Ok(clauses) => println!("OK: {} clauses", clauses.len()),
        Err(e) => println!("OK: not editable as clauses ({})", e),
    }
    Ok(())
}
