#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads the API document, generates the client unit and writes it (or
//! prints it with `--dry-run`).

use std::fs;
use std::path::PathBuf;

use oasgen_core::{generate_client, write_atomic, GeneratorOptions};

use crate::error::{CliError, CliResult};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, env = "OASGEN_INPUT", default_value = "openapi.yaml")]
    pub input: PathBuf,

    /// Output path for the generated client.
    #[clap(long, env = "OASGEN_OUTPUT", default_value = "src/generated.rs")]
    pub output: PathBuf,

    /// Name of the generated client struct.
    #[clap(long, default_value = "ApiClient")]
    pub client_name: String,

    /// Crate path the generated code imports as `rt`.
    #[clap(long, default_value = "oasgen_runtime")]
    pub runtime_crate: String,

    /// Print the generated code instead of writing it.
    #[clap(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    fn options(&self) -> GeneratorOptions {
        let source_name = self
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.to_string_lossy().into_owned());
        GeneratorOptions {
            client_name: self.client_name.clone(),
            runtime_crate: self.runtime_crate.clone(),
            source_name,
        }
    }
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    if !args.input.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.input
        )));
    }

    let source = fs::read_to_string(&args.input)?;
    let code = generate_client(&source, &args.options())?;

    if args.dry_run {
        print!("{}", code);
        return Ok(());
    }

    write_atomic(&args.output, &code)?;
    tracing::info!("Generated client at {:?}", args.output);
    println!("Generated client at {:?}", args.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOC: &str = r#"
openapi: 3.0.3
info: {title: Widgets, version: '1.0'}
paths:
  /widgets/{id}:
    get:
      operationId: getWidget
      parameters:
        - {name: id, in: path, required: true, schema: {type: string}}
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Widget'}
components:
  schemas:
    Widget:
      type: object
      properties:
        id: {type: string}
"#;

    fn args(dir: &std::path::Path) -> GenerateArgs {
        GenerateArgs {
            input: dir.join("openapi.yaml"),
            output: dir.join("src").join("generated.rs"),
            client_name: "WidgetClient".into(),
            runtime_crate: "oasgen_runtime".into(),
            dry_run: false,
        }
    }

    #[test]
    fn test_execute_writes_client() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.yaml"), DOC).unwrap();
        let args = args(dir.path());

        execute(&args).unwrap();

        let code = fs::read_to_string(&args.output).unwrap();
        assert!(code.contains("pub struct WidgetClient<T = rt::UreqTransport>"));
        assert!(code.contains("pub fn get_widget("));
        assert!(code.contains("from `openapi.yaml`"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.yaml"), DOC).unwrap();
        let args = GenerateArgs {
            dry_run: true,
            ..args(dir.path())
        };

        execute(&args).unwrap();
        assert!(!args.output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = execute(&args(dir.path())).unwrap_err();
        assert!(format!("{}", err).contains("OpenAPI file not found"));
    }

    #[test]
    fn test_generation_error_is_surfaced() {
        let dir = tempdir().unwrap();
        let broken = DOC.replace("'200'", "'404'");
        fs::write(dir.path().join("openapi.yaml"), broken).unwrap();
        let args = args(dir.path());

        let err = execute(&args).unwrap_err();
        assert!(matches!(err, CliError::Generation(_)));
        assert!(!args.output.exists());
    }
}
