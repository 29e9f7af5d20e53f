//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the generator.
//!
//! Every variant is fatal: generation stops at the first error and no output
//! unit is written.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The input document is not valid YAML/JSON or does not match the expected layout.
    #[display("Document Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A schema uses a shape the generator cannot map to a type.
    #[from(ignore)]
    #[display("Unsupported schema shape at '{location}': {reason}")]
    UnsupportedSchemaShape {
        /// Where the schema was found (e.g. `Widget.color`).
        location: String,
        /// What made the shape unsupported.
        reason: String,
    },

    /// Two different definitions claim the same generated name.
    #[from(ignore)]
    #[display("Naming conflict for '{name}': {reason}")]
    NamingConflict {
        /// The contested name.
        name: String,
        /// Why the second claim was refused.
        reason: String,
    },

    /// An operation declares no 2xx response.
    #[from(ignore)]
    #[display("Operation '{operation}' declares no 2xx response")]
    MissingSuccessResponse {
        /// `VERB /path` of the operation.
        operation: String,
    },

    /// A path or query parameter cannot be serialized into a single URI value.
    #[from(ignore)]
    #[display("Unsupported parameter '{parameter}' on '{operation}': {reason}")]
    UnsupportedParameterShape {
        /// `VERB /path` of the operation.
        operation: String,
        /// The parameter name as declared.
        parameter: String,
        /// Why the parameter was refused.
        reason: String,
    },

    /// A `$ref` points at something the document does not define.
    #[from(ignore)]
    #[display("Unresolved reference '{reference}'")]
    UnresolvedReference {
        /// The raw reference string.
        reference: String,
    },

    /// The rendered output did not parse as Rust.
    #[from(ignore)]
    #[display("Generated code is invalid: {_0}")]
    InvalidOutput(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
