#![deny(missing_docs)]

//! # Check Command
//!
//! Runs the whole generation without writing and reports what it would
//! produce.

use std::fs;
use std::path::PathBuf;

use oasgen_core::{load_document, render, validate_source, Generator, GeneratorOptions};

use crate::error::{CliError, CliResult};

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, env = "OASGEN_INPUT", default_value = "openapi.yaml")]
    pub input: PathBuf,

    /// Name the generated client struct would take.
    #[clap(long, default_value = "ApiClient")]
    pub client_name: String,
}

/// Executes the check and prints a one-line summary.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    if !args.input.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.input
        )));
    }

    let source = fs::read_to_string(&args.input)?;
    let document = load_document(&source)?;
    let options = GeneratorOptions {
        client_name: args.client_name.clone(),
        ..GeneratorOptions::default()
    };
    options.validate()?;
    let plan = Generator::new(&document, &options).plan()?;
    validate_source(&render(&plan, &document, &options))?;

    println!(
        "{:?}: {} methods, {} structs, {} enums, {} aliases",
        args.input,
        plan.operations.len(),
        plan.composites.len(),
        plan.enums.len(),
        plan.aliases.len()
    );
    Ok(())
}
