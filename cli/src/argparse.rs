use clap::{Args, Parser, Subcommand};
use search_clause_cli::config::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sclause",
    about = "Convert between alarm log search clauses and query strings",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file, defaults to <config dir>/sclause/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a query string from a YAML or JSON list of clauses
    ToQuery(ToQueryArgs),
    /// Parse a query string into clauses
    Parse(ParseArgs),
    /// Check the syntax of a query string
    Check(CheckArgs),
    /// List the known index fields
    Fields,
}

#[derive(Args)]
pub struct ToQueryArgs {
    /// Clause file, `.json` or YAML
    #[arg(long, short)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Query string to parse
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Field for terms without a field prefix, overrides the config
    #[arg(long)]
    pub default_field: Option<String>,

    /// Output format, overrides the config
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Query string to check
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Field for terms without a field prefix, overrides the config
    #[arg(long)]
    pub default_field: Option<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
