#![deny(missing_docs)]

//! # oasgen Runtime
//!
//! Support library for clients generated by `oasgen`. Generated code imports
//! it as `rt` and calls only the items re-exported here.

/// Runtime error types.
pub mod error;

/// Requests, responses and URI helpers.
pub mod http;

/// Per-call observer hooks.
pub mod observer;

/// Next-link pagination.
pub mod pagination;

/// The retry wrapper.
pub mod retry;

/// Transport boundary and default implementation.
pub mod transport;

pub use error::{ClientError, ClientResult, UnknownEnumValue};
pub use http::{
    build_uri, encode_path_segment, join_values, resolve_link, HttpRequest, HttpResponse, Method,
    QueryString,
};
pub use observer::{RequestObserver, TracingObserver};
pub use pagination::{fetch_next_page, Paginated};
pub use retry::{with_retries, with_retries_using, DEFAULT_RETRIES, RETRY_DELAY};
pub use transport::{decode_json, execute, Transport, UreqTransport};
pub use url::Url;
