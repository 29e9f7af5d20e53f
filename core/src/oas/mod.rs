#![deny(missing_docs)]

//! # OpenAPI Input Module
//!
//! - **shims**: Raw deserialization layer for YAML/JSON documents.
//! - **refs**: Local `$ref` resolution helpers.
//! - **schema**: The schema sum type and lowering from shims.
//! - **document**: Operations, parameters and the loaded document.

pub mod document;
pub mod refs;
pub mod schema;
pub mod shims;

pub use document::{
    load_document, ApiDocument, HttpVerb, Operation, Parameter, RequestBody, Response,
};
pub use schema::{ObjectShape, Schema, SchemaKind};
