#![deny(missing_docs)]

//! # Document Shims
//!
//! Generic structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to OpenAPI YAML objects and keep the declared
//! order of properties, path items and operations (`IndexMap`).
//!
//! Only the subset of the format the generator consumes is modelled; unknown
//! keys are ignored.

use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

/// Schema for the root document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimDocument {
    /// OpenAPI version (e.g. "3.1.0").
    pub openapi: Option<String>,

    /// Swagger version (e.g. "2.0"), only used to reject legacy documents.
    pub swagger: Option<String>,

    /// Metadata about the API.
    pub info: Option<ShimInfo>,

    /// Path items keyed by path template, in declared order.
    #[serde(default)]
    pub paths: IndexMap<String, ShimPathItem>,

    /// Reusable components.
    pub components: Option<ShimComponents>,
}

/// The `info` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimInfo {
    /// API title.
    pub title: Option<String>,
    /// API version (kept raw: `1.0` parses as a number).
    pub version: Option<Value>,
}

/// The `components` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimComponents {
    /// Named schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, ShimSchema>,
    /// Reusable parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, ShimParameter>,
    /// Reusable request bodies.
    #[serde(default)]
    pub request_bodies: IndexMap<String, ShimRequestBody>,
    /// Reusable responses.
    #[serde(default)]
    pub responses: IndexMap<String, ShimResponse>,
}

/// The `type` keyword: a single name, or a list of names in OpenAPI 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ShimType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Many(Vec<String>),
}

/// A Schema Object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimSchema {
    /// `$ref` pointer.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    /// Declared type.
    #[serde(rename = "type")]
    pub schema_type: Option<ShimType>,

    /// Format hint (`int32`, `int64`, `float`, `double`, ...).
    pub format: Option<String>,

    /// Title hint.
    pub title: Option<String>,

    /// Free-form description.
    pub description: Option<String>,

    /// Allowed literal values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    /// Item schema for arrays.
    pub items: Option<Box<ShimSchema>>,

    /// Object properties in declared order.
    #[serde(default)]
    pub properties: IndexMap<String, ShimSchema>,

    /// Required property names.
    #[serde(default)]
    pub required: Vec<String>,

    /// `oneOf` alternatives.
    pub one_of: Option<Vec<ShimSchema>>,

    /// `anyOf` alternatives.
    pub any_of: Option<Vec<ShimSchema>>,

    /// `allOf` members.
    pub all_of: Option<Vec<ShimSchema>>,

    /// Deprecation marker.
    #[serde(default)]
    pub deprecated: bool,
}

/// A Path Item Object.
///
/// Operations are kept in the order they are declared; non-operation keys
/// other than `parameters` are ignored.
#[derive(Debug, Clone, Default)]
pub struct ShimPathItem {
    /// Parameters shared by every operation of this path.
    pub parameters: Vec<ShimParameter>,
    /// `(lowercase verb, operation)` pairs in declared order.
    pub operations: Vec<(String, ShimOperation)>,
}

/// Keys of a Path Item Object that hold operations.
pub const OPERATION_KEYS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

impl<'de> Deserialize<'de> for ShimPathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut item = ShimPathItem::default();

        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_yaml::from_value(value).map_err(|e| {
                    DeError::custom(format!("Failed to parse path parameters: {}", e))
                })?;
                continue;
            }
            let verb = key.to_ascii_lowercase();
            if !OPERATION_KEYS.contains(&verb.as_str()) {
                continue;
            }
            let operation = serde_yaml::from_value::<ShimOperation>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse operation '{}': {}", key, e))
            })?;
            item.operations.push((verb, operation));
        }

        Ok(item)
    }
}

/// An Operation Object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimOperation {
    /// Stable identifier.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: Vec<ShimParameter>,
    /// Request body.
    pub request_body: Option<ShimRequestBody>,
    /// Responses keyed by status code, in declared order.
    #[serde(default)]
    pub responses: IndexMap<String, ShimResponse>,
    /// Deprecation marker.
    #[serde(default)]
    pub deprecated: bool,
}

/// A Parameter Object (or a reference to one).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimParameter {
    /// `$ref` pointer.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Parameter name.
    pub name: Option<String>,
    /// Location (`path`, `query`, `header`, `cookie`).
    #[serde(rename = "in")]
    pub location: Option<String>,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Deprecation marker.
    #[serde(default)]
    pub deprecated: bool,
    /// Value schema.
    pub schema: Option<ShimSchema>,
}

/// A Request Body Object (or a reference to one).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimRequestBody {
    /// `$ref` pointer.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Media types.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Whether the body must be supplied.
    #[serde(default)]
    pub required: bool,
}

/// A Response Object (or a reference to one).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimResponse {
    /// `$ref` pointer.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Response description.
    pub description: Option<String>,
    /// Media types.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

/// A Media Type Object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimMediaType {
    /// Payload schema.
    pub schema: Option<ShimSchema>,
}

/// Returns true for media types that carry JSON.
pub fn is_json_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Parses a raw YAML (or JSON) document into shims.
///
/// Unquoted numeric mapping keys (`200:` under `responses`) are turned into
/// strings first so every map can be keyed by `String`.
pub fn parse_shim_document(content: &str) -> Result<ShimDocument, serde_yaml::Error> {
    let raw: Value = serde_yaml::from_str(content)?;
    serde_yaml::from_value(stringify_keys(raw))
}

fn stringify_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => {
            let mut out = Mapping::new();
            for (key, value) in mapping {
                let key = match key {
                    Value::Number(n) => Value::String(n.to_string()),
                    Value::Bool(b) => Value::String(b.to_string()),
                    other => other,
                };
                out.insert(key, stringify_keys(value));
            }
            Value::Mapping(out)
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(stringify_keys).collect()),
        Value::Tagged(tagged) => stringify_keys(tagged.value),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_keep_declared_order() {
        let yaml = r#"
openapi: 3.1.0
info: {title: T, version: 1.0}
paths:
  /widgets:
    summary: ignored
    post: {operationId: create, responses: {'201': {description: Created}}}
    get: {operationId: list, responses: {'200': {description: OK}}}
    x-internal: true
"#;
        let doc = parse_shim_document(yaml).unwrap();
        let item = &doc.paths["/widgets"];
        let verbs: Vec<&str> = item.operations.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(verbs, vec!["post", "get"]);
    }

    #[test]
    fn test_numeric_response_keys() {
        let yaml = r#"
openapi: 3.0.0
paths:
  /ping:
    get:
      operationId: ping
      responses:
        204:
          description: No Content
"#;
        let doc = parse_shim_document(yaml).unwrap();
        let (_, op) = &doc.paths["/ping"].operations[0];
        assert!(op.responses.contains_key("204"));
    }

    #[test]
    fn test_properties_keep_declared_order() {
        let yaml = r#"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Widget:
      type: object
      properties:
        zeta: {type: string}
        alpha: {type: integer}
        mid: {type: boolean}
"#;
        let doc = parse_shim_document(yaml).unwrap();
        let schema = &doc.components.unwrap().schemas["Widget"];
        let names: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_type_list() {
        let yaml = "type: [string, 'null']";
        let schema: ShimSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            schema.schema_type,
            Some(ShimType::Many(vec!["string".into(), "null".into()]))
        );
    }

    #[test]
    fn test_json_media_types() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("application/json; charset=utf-8"));
        assert!(is_json_media_type("application/vnd.api+json"));
        assert!(!is_json_media_type("application/octet-stream"));
    }
}
