//! # HTTP Model
//!
//! Transport-neutral request/response values and the URI helpers generated
//! method bodies call.

use crate::error::{ClientError, ClientResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;
use url::Url;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Like [`PATH_SEGMENT`], but commas separating joined values stay literal.
const QUERY_VALUE: &AsciiSet = &PATH_SEGMENT.remove(b',');

/// HTTP verbs a generated method can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl Method {
    /// Upper-case token (`GET`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Verb.
    pub method: Method,
    /// Absolute target.
    pub uri: Url,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a request without a body.
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            body: None,
        }
    }

    /// Attaches `body` serialized as JSON.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_string(body).map_err(ClientError::Encode)?);
        Ok(self)
    }
}

/// One received response, any status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Body text (empty when absent).
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Encoded `name=value` pairs in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    encoded: String,
}

impl QueryString {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one pair. Both sides are percent-encoded.
    pub fn push(&mut self, name: &str, value: impl fmt::Display) {
        if !self.encoded.is_empty() {
            self.encoded.push('&');
        }
        self.encoded
            .extend(utf8_percent_encode(name, QUERY_VALUE));
        self.encoded.push('=');
        self.encoded
            .extend(utf8_percent_encode(&value.to_string(), QUERY_VALUE));
    }

    /// True when no pair was pushed.
    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    /// The encoded query, without the leading `?`.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

/// Percent-encodes `value` as a single path segment (`/` included).
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Joins values with commas (`[1, 2]` -> `1,2`).
pub fn join_values<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Appends an already substituted `path` and `query` to `base`.
///
/// The base path is kept: `https://h/api` + `/widgets` is `https://h/api/widgets`.
pub fn build_uri(base: &Url, path: &str, query: &QueryString) -> ClientResult<Url> {
    let mut text = base.as_str().trim_end_matches('/').to_string();
    if !path.starts_with('/') {
        text.push('/');
    }
    text.push_str(path);
    if !query.is_empty() {
        text.push('?');
        text.push_str(query.as_str());
    }
    Ok(Url::parse(&text)?)
}

/// Resolves a next-page link: absolute links are used as is, relative ones
/// are appended to `base` like a path template.
pub fn resolve_link(base: &Url, link: &str) -> ClientResult<Url> {
    match Url::parse(link) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let text = format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                link.trim_start_matches('/')
            );
            Ok(Url::parse(&text)?)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://api.example.com/v1/").unwrap()
    }

    #[test]
    fn test_build_uri_keeps_base_path() {
        let mut query = QueryString::new();
        query.push("tags", join_values(&["a b", "c"]));
        query.push("limit", 10);
        let uri = build_uri(&base(), "/widgets/x%2Fy", &query).unwrap();
        assert_eq!(
            uri.as_str(),
            "https://api.example.com/v1/widgets/x%2Fy?tags=a%20b,c&limit=10"
        );
    }

    #[test]
    fn test_build_uri_without_query() {
        let uri = build_uri(&base(), "/widgets", &QueryString::new()).unwrap();
        assert_eq!(uri.as_str(), "https://api.example.com/v1/widgets");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path_segment("plain-id_1.2~"), "plain-id_1.2~");
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link(&base(), "/widgets?page=2").unwrap().as_str(),
            "https://api.example.com/v1/widgets?page=2"
        );
        assert_eq!(
            resolve_link(&base(), "https://other.example.com/p/3")
                .unwrap()
                .as_str(),
            "https://other.example.com/p/3"
        );
    }

    #[test]
    fn test_with_json() {
        let request = HttpRequest::new(Method::Post, base())
            .with_json(&vec![1, 2])
            .unwrap();
        assert_eq!(request.body.as_deref(), Some("[1,2]"));
    }
}
