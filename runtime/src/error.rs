//! # Error Handling
//!
//! Errors a generated client surfaces once its retry budget is spent.

use derive_more::{Display, From};

/// The runtime error enum.
///
/// The retry wrapper treats every variant the same way.
#[derive(Debug, Display, From)]
pub enum ClientError {
    /// The exchange itself failed (connection, TLS, I/O).
    #[from(ignore)]
    #[display("Transport Error: {_0}")]
    Transport(String),

    /// The server answered outside the 2xx range.
    #[from(ignore)]
    #[display("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body as received.
        body: String,
    },

    /// A success body did not match the expected type.
    #[display("Deserialize Error: {_0}")]
    Deserialize(serde_json::Error),

    /// A request body could not be serialized.
    #[from(ignore)]
    #[display("Encode Error: {_0}")]
    Encode(serde_json::Error),

    /// A success response carried no value where one was expected.
    #[from(ignore)]
    #[display("Empty response body")]
    EmptyBody,

    /// A base address, path or next link did not form a valid URI.
    #[display("URI Error: {_0}")]
    Uri(url::ParseError),
}

impl std::error::Error for ClientError {}

/// A wire literal that names no member of a generated enum.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("Unknown {type_name} value '{value}'")]
pub struct UnknownEnumValue {
    /// The enum's Rust name.
    pub type_name: &'static str,
    /// The rejected literal.
    pub value: String,
}

impl UnknownEnumValue {
    /// Creates the error for `value` parsed as `type_name`.
    pub fn new(type_name: &'static str, value: &str) -> Self {
        Self {
            type_name,
            value: value.to_string(),
        }
    }
}

impl std::error::Error for UnknownEnumValue {}

/// Helper type alias for Result using ClientError.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ClientError::Status {
            status: 404,
            body: "missing".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: missing");
    }

    #[test]
    fn test_uri_conversion() {
        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ClientError::Uri(_)));
    }

    #[test]
    fn test_unknown_enum_value_display() {
        let err = UnknownEnumValue::new("WidgetColor", "BLUE");
        assert_eq!(err.to_string(), "Unknown WidgetColor value 'BLUE'");
    }
}
