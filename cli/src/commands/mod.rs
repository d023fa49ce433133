mod check;
mod fields;
mod parse;
mod to_query;

use crate::argparse::Commands;
use search_clause_cli::config::Config;

pub use check::handle_check_command;
pub use fields::handle_fields_command;
pub use parse::handle_parse_command;
pub use to_query::handle_to_query_command;

pub fn handle_command(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::ToQuery(args) => handle_to_query_command(args, config),
        Commands::Parse(args) => handle_parse_command(args, config),
        Commands::Check(args) => handle_check_command(args, config),
        Commands::Fields => handle_fields_command(config),
    }
}
