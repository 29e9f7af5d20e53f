#![deny(missing_docs)]

//! # oasgen Core
//!
//! Turns an OpenAPI 3 document into a single Rust source unit holding the
//! data types and a blocking client for every operation.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) loading and schema model.
pub mod oas;

/// Planning and rendering of the client unit.
pub mod codegen;

/// Output validation and atomic writes.
pub mod output;

use std::path::Path;

pub use codegen::{generate, render, ClientPlan, Generator, GeneratorOptions};
pub use error::{AppError, AppResult};
pub use oas::{
    load_document, ApiDocument, HttpVerb, ObjectShape, Operation, Parameter, RequestBody,
    Response, Schema, SchemaKind,
};
pub use output::{validate_source, write_atomic};

/// Loads `source`, generates the client and checks it parses.
pub fn generate_client(source: &str, options: &GeneratorOptions) -> AppResult<String> {
    let document = load_document(source)?;
    let code = generate(&document, options)?;
    validate_source(&code)?;
    Ok(code)
}

/// Generates the client for `source` and writes it to `output`.
///
/// Nothing is written when generation fails.
pub fn write_client(source: &str, options: &GeneratorOptions, output: &Path) -> AppResult<()> {
    let code = generate_client(source, options)?;
    write_atomic(output, &code)?;
    tracing::info!("Generated client written to {}", output.display());
    Ok(())
}
