//! # oasgen Sample
//!
//! The client generated from `openapi.yaml`, checked in so the generated
//! contracts (retry, pagination, enums, defaults) are compiled and tested.
//!
//! Regenerate with `oasgen generate --input sample/openapi.yaml --output sample/src/generated.rs`.

pub mod generated;

pub use generated::*;
