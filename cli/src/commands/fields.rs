use anyhow::Result;
use search_clause::AlarmLogField;
use search_clause_cli::config::Config;
use std::str::FromStr;
use tabular::{Row, Table};

pub fn handle_fields_command(config: &Config) -> Result<()> {
    print!("{}", fields_table(config));
    Ok(())
}

fn fields_table(config: &Config) -> Table {
    let mut table = Table::new("{:<}  {:<}  {:<}")
        .with_row(Row::from_cells(["Field", "Type", "Default"].iter().cloned()));
    for field in &config.fields {
        let kind = match AlarmLogField::from_str(field) {
            Ok(f) if f.is_time() => "time",
            Ok(_) => "text",
            Err(_) => "custom",
        };
        let is_default = if *field == config.default_field { "*" } else { "" };
        table.add_row(
            Row::new()
                .with_cell(field)
                .with_cell(kind)
                .with_cell(is_default),
        );
    }
    table
}
