use crate::argparse::ParseArgs;
use anyhow::Result;
use search_clause::{parse_query_string, SearchClause};
use search_clause_cli::config::{Config, OutputFormat};
use search_clause_cli::CliError;
use tabular::{Row, Table};

pub fn handle_parse_command(args: ParseArgs, config: &Config) -> Result<()> {
    let default_field = args.default_field.as_deref().unwrap_or(&config.default_field);
    let format = args.format.unwrap_or(config.output);

    let clauses = parse_query_string(&args.query, default_field).map_err(CliError::from)?;
    for clause in &clauses {
        if !config.is_known_field(clause.field_name()) {
            log::warn!("Unknown field `{}` in query", clause.field_name());
        }
    }

    print!("{}", render_clauses(&clauses, format)?);
    Ok(())
}

pub fn render_clauses(clauses: &[SearchClause], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => {
            let mut table = Table::new("{:<}  {:<}  {:<}  {:<}  {:<}").with_row(Row::from_cells(
                ["Negation", "Field", "Term", "To", "Literal"].iter().cloned(),
            ));
            for clause in clauses {
                table.add_row(
                    Row::new()
                        .with_cell(clause.negation())
                        .with_cell(clause.field_name())
                        .with_cell(clause.term1())
                        .with_cell(clause.term2())
                        .with_cell(clause.wildcard_literal()),
                );
            }
            table.to_string()
        }
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(clauses)?),
        OutputFormat::Yaml => serde_yaml_ng::to_string(clauses)?,
    };
    Ok(rendered)
}
