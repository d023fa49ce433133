use crate::argparse::ToQueryArgs;
use anyhow::{Context, Result};
use search_clause::{list_to_query, SearchClause};
use search_clause_cli::config::Config;
use search_clause_cli::CliError;
use std::path::Path;

pub fn handle_to_query_command(args: ToQueryArgs, config: &Config) -> Result<()> {
    let clauses = load_clauses(&args.file)?;
    for clause in &clauses {
        if !clause.field_name().is_empty() && !config.is_known_field(clause.field_name()) {
            log::warn!("Unknown field in clause {}", clause);
        }
    }

    let query = list_to_query(&clauses).map_err(CliError::from)?;
    println!("{}", query);
    Ok(())
}

/// Reads a clause list; `.json` files are parsed as JSON, anything else as YAML.
pub fn load_clauses(path: &Path) -> Result<Vec<SearchClause>> {
    let content = fs_err::read_to_string(path)
        .with_context(|| format!("Failed to read clause file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let clauses: Vec<SearchClause> = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON clause file: {}", path.display()))?
    } else {
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse YAML clause file: {}", path.display()))?
    };

    log::debug!("Loaded {} clauses from {}", clauses.len(), path.display());
    Ok(clauses)
}
