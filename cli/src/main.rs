#![deny(missing_docs)]

//! # oasgen CLI
//!
//! Command Line Interface for the OpenAPI client generator.
//!
//! Supported Commands:
//! - `generate`: OpenAPI document -> typed Rust client unit.
//! - `check`: Loads and plans a document without writing anything.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod check;
mod error;
mod generate;
mod logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI client generator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a client from an OpenAPI document.
    Generate(generate::GenerateArgs),
    /// Validate that a document can be generated.
    Check(check::CheckArgs),
}

fn main() -> CliResult<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Check(args) => check::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_is_counted() {
        let cli = Cli::parse_from(["oasgen", "-vv", "generate", "--dry-run"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Generate(ref args) if args.dry_run));
    }
}
