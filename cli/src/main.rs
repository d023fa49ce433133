mod argparse;
mod commands;
mod utils;

use argparse::parse_args;
use search_clause_cli::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_args();
    utils::init_logger(cli.verbose);

    let result = Config::load_or_default(cli.config.as_deref())
        .and_then(|config| commands::handle_command(cli.command, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(search_clause_cli::exit_code(&e))
        }
    }
}
