#![deny(missing_docs)]

//! # API Document
//!
//! Loads a raw document into the model the generator walks: named schemas in
//! alphabetical order and operations ordered by path (alphabetical) and then
//! by declaration order within each path.
//!
//! Component references for parameters, request bodies and responses are
//! resolved here so the generator only sees inline values.

use crate::error::{AppError, AppResult};
use crate::oas::refs::resolve_component;
use crate::oas::schema::{Schema, SchemaKind, SchemaLowering};
use crate::oas::shims::{
    is_json_media_type, parse_shim_document, ShimComponents, ShimMediaType, ShimParameter,
    ShimRequestBody, ShimResponse, ShimSchema,
};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// HTTP methods an operation can be declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
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

impl HttpVerb {
    /// Maps a lowercase path item key to a verb.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpVerb::Get),
            "put" => Some(HttpVerb::Put),
            "post" => Some(HttpVerb::Post),
            "delete" => Some(HttpVerb::Delete),
            "options" => Some(HttpVerb::Options),
            "head" => Some(HttpVerb::Head),
            "patch" => Some(HttpVerb::Patch),
            "trace" => Some(HttpVerb::Trace),
            _ => None,
        }
    }

    /// Uppercase wire name (`GET`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Put => "PUT",
            HttpVerb::Post => "POST",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Options => "OPTIONS",
            HttpVerb::Head => "HEAD",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Trace => "TRACE",
        }
    }

    /// Variant name of the runtime `Method` enum (`Get`).
    pub fn runtime_variant(&self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Put => "Put",
            HttpVerb::Post => "Post",
            HttpVerb::Delete => "Delete",
            HttpVerb::Options => "Options",
            HttpVerb::Head => "Head",
            HttpVerb::Patch => "Patch",
            HttpVerb::Trace => "Trace",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path or query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name as declared (also the wire name).
    pub name: String,
    /// Value schema (a plain string when none was declared).
    pub schema: Schema,
    /// Whether the caller must supply the value. Always true for path parameters.
    pub required: bool,
    /// Deprecation marker.
    pub deprecated: bool,
}

/// A JSON request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    /// Payload schema.
    pub schema: Schema,
    /// Whether the body must be supplied.
    pub required: bool,
}

/// One declared response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status key as declared (`200`, `204`, `default`).
    pub status: String,
    /// JSON payload schema, if any.
    pub schema: Option<Schema>,
}

impl Response {
    /// True for numeric status codes in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        self.status
            .parse::<u16>()
            .is_ok_and(|code| (200..300).contains(&code))
    }
}

/// One HTTP operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Path template with `{param}` placeholders.
    pub path: String,
    /// Stable identifier (declared, or derived from verb and path).
    pub operation_id: String,
    /// Short summary.
    pub summary: Option<String>,
    /// Path parameters in declared order.
    pub path_params: Vec<Parameter>,
    /// Query parameters in declared order.
    pub query_params: Vec<Parameter>,
    /// JSON request body.
    pub request_body: Option<RequestBody>,
    /// Responses in declared order.
    pub responses: Vec<Response>,
    /// Deprecation marker.
    pub deprecated: bool,
}

impl Operation {
    /// `VERB /path`, used in messages and docs.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.verb, self.path)
    }

    /// The first declared 2xx response.
    pub fn success_response(&self) -> Option<&Response> {
        self.responses.iter().find(|r| r.is_success())
    }
}

/// The loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    /// `info.title`.
    pub title: Option<String>,
    /// Named schemas, sorted by name.
    pub schemas: Vec<(String, Schema)>,
    /// Operations in walk order.
    pub operations: Vec<Operation>,
}

/// Derives an operation identifier from verb and path.
/// e.g. `GET /users/{id}` -> `get_users_id`
pub fn derive_operation_id(verb: HttpVerb, path: &str) -> String {
    let clean_path = path.replace(['{', '}'], "").replace('/', "_");
    format!(
        "{}_{}",
        verb.as_str().to_lowercase(),
        clean_path.trim_start_matches('_')
    )
}

/// Parses and loads a YAML or JSON document.
pub fn load_document(content: &str) -> AppResult<ApiDocument> {
    let shim = parse_shim_document(content)?;

    if let Some(version) = &shim.swagger {
        return Err(AppError::General(format!(
            "Swagger {} documents are not supported; convert to OpenAPI 3",
            version
        )));
    }
    match shim.openapi.as_deref() {
        Some(version) if version.starts_with("3.") => {}
        Some(version) => {
            return Err(AppError::General(format!(
                "Unsupported OpenAPI version '{}'",
                version
            )))
        }
        None => {
            return Err(AppError::General(
                "Document has no 'openapi' version field".into(),
            ))
        }
    }

    let components = shim.components.unwrap_or_default();
    let lowering = SchemaLowering::new(&components.schemas);

    let mut names: Vec<&String> = components.schemas.keys().collect();
    names.sort();
    let mut schemas = Vec::with_capacity(names.len());
    for name in names {
        let schema = lowering.lower(&components.schemas[name], name)?;
        schemas.push((name.clone(), schema));
    }

    let mut paths: Vec<&String> = shim.paths.keys().collect();
    paths.sort();
    let mut operations = Vec::new();
    for path in paths {
        let item = &shim.paths[path];
        for (key, op) in &item.operations {
            let Some(verb) = HttpVerb::from_key(key) else {
                continue;
            };
            let location = format!("{} {}", verb, path);

            let mut path_params = Vec::new();
            let mut query_params = Vec::new();
            let mut seen = HashSet::new();
            // Operation declarations take precedence over path item ones.
            for raw in op.parameters.iter().chain(item.parameters.iter()) {
                let param = resolve_parameter(raw, &components)?;
                let name = param.name.clone().ok_or_else(|| {
                    AppError::General(format!("Parameter without a name on '{}'", location))
                })?;
                let param_location = param.location.clone().unwrap_or_default();
                if !seen.insert((name.clone(), param_location.clone())) {
                    continue;
                }
                let schema = match &param.schema {
                    Some(schema) => {
                        lowering.lower(schema, &format!("{} parameter '{}'", location, name))?
                    }
                    None => Schema::new(SchemaKind::String { values: Vec::new() }),
                };
                match param_location.as_str() {
                    "path" => path_params.push(Parameter {
                        name,
                        schema,
                        required: true,
                        deprecated: param.deprecated,
                    }),
                    "query" => query_params.push(Parameter {
                        name,
                        schema,
                        required: param.required,
                        deprecated: param.deprecated,
                    }),
                    other => {
                        tracing::debug!(
                            "Ignoring {} parameter '{}' on '{}'",
                            other,
                            name,
                            location
                        );
                    }
                }
            }

            let request_body = match &op.request_body {
                Some(body) => {
                    let body = resolve_request_body(body, &components)?;
                    match json_schema(&body.content) {
                        Some(schema) => Some(RequestBody {
                            schema: lowering.lower(schema, &format!("{} request body", location))?,
                            required: body.required,
                        }),
                        None => {
                            tracing::debug!("Request body of '{}' is not JSON; skipped", location);
                            None
                        }
                    }
                }
                None => None,
            };

            let mut responses = Vec::new();
            for (status, response) in &op.responses {
                let response = resolve_response(response, &components)?;
                let schema = match json_schema(&response.content) {
                    Some(schema) => Some(
                        lowering.lower(schema, &format!("{} response {}", location, status))?,
                    ),
                    None => None,
                };
                responses.push(Response {
                    status: status.clone(),
                    schema,
                });
            }

            operations.push(Operation {
                verb,
                path: path.clone(),
                operation_id: op
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| derive_operation_id(verb, path)),
                summary: op.summary.clone().or_else(|| op.description.clone()),
                path_params,
                query_params,
                request_body,
                responses,
                deprecated: op.deprecated,
            });
        }
    }

    tracing::debug!(
        "Loaded document with {} schemas and {} operations",
        schemas.len(),
        operations.len()
    );

    Ok(ApiDocument {
        title: shim.info.and_then(|info| info.title),
        schemas,
        operations,
    })
}

fn resolve_parameter<'a>(
    param: &'a ShimParameter,
    components: &'a ShimComponents,
) -> AppResult<&'a ShimParameter> {
    match &param.reference {
        Some(reference) => Ok(resolve_component(reference, "parameters", &components.parameters)?.1),
        None => Ok(param),
    }
}

fn resolve_request_body<'a>(
    body: &'a ShimRequestBody,
    components: &'a ShimComponents,
) -> AppResult<&'a ShimRequestBody> {
    match &body.reference {
        Some(reference) => {
            Ok(resolve_component(reference, "requestBodies", &components.request_bodies)?.1)
        }
        None => Ok(body),
    }
}

fn resolve_response<'a>(
    response: &'a ShimResponse,
    components: &'a ShimComponents,
) -> AppResult<&'a ShimResponse> {
    match &response.reference {
        Some(reference) => Ok(resolve_component(reference, "responses", &components.responses)?.1),
        None => Ok(response),
    }
}

fn json_schema(content: &IndexMap<String, ShimMediaType>) -> Option<&ShimSchema> {
    content
        .iter()
        .filter(|(media_type, _)| is_json_media_type(media_type))
        .find_map(|(_, media)| media.schema.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
openapi: 3.0.3
info:
  title: Widgets
  version: 1.0
paths:
  /widgets/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema: {type: string}
      - name: X-Trace
        in: header
        schema: {type: string}
    get:
      operationId: getWidget
      parameters:
        - $ref: '#/components/parameters/Verbose'
      responses:
        '404': {description: missing}
        '200':
          description: ok
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Widget'}
    delete:
      responses:
        204: {$ref: '#/components/responses/Empty'}
  /alpha:
    post:
      operationId: createAlpha
      requestBody:
        $ref: '#/components/requestBodies/AlphaBody'
      responses:
        '201': {description: created}
components:
  schemas:
    Widget:
      type: object
      properties:
        id: {type: string}
    Alpha:
      type: string
  parameters:
    Verbose:
      name: verbose
      in: query
      schema: {type: boolean}
  requestBodies:
    AlphaBody:
      required: true
      content:
        text/plain:
          schema: {type: string}
        application/json:
          schema: {$ref: '#/components/schemas/Alpha'}
  responses:
    Empty:
      description: nothing
"#;

    #[test]
    fn test_walk_order() {
        let doc = load_document(DOC).unwrap();
        let schema_names: Vec<&str> = doc.schemas.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(schema_names, vec!["Alpha", "Widget"]);

        let ops: Vec<String> = doc.operations.iter().map(|o| o.display_name()).collect();
        assert_eq!(
            ops,
            vec!["POST /alpha", "GET /widgets/{id}", "DELETE /widgets/{id}"]
        );
        assert_eq!(doc.title.as_deref(), Some("Widgets"));
    }

    #[test]
    fn test_parameters_are_merged_and_resolved() {
        let doc = load_document(DOC).unwrap();
        let get = &doc.operations[1];
        assert_eq!(get.path_params.len(), 1);
        assert_eq!(get.path_params[0].name, "id");
        assert!(get.path_params[0].required);
        assert_eq!(get.query_params.len(), 1);
        assert_eq!(get.query_params[0].name, "verbose");
        assert!(!get.query_params[0].required);
    }

    #[test]
    fn test_bodies_and_responses() {
        let doc = load_document(DOC).unwrap();
        let create = &doc.operations[0];
        let body = create.request_body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(body.schema.reference.as_deref(), Some("Alpha"));

        let get = &doc.operations[1];
        let success = get.success_response().unwrap();
        assert_eq!(success.status, "200");
        assert_eq!(
            success.schema.as_ref().unwrap().reference.as_deref(),
            Some("Widget")
        );

        let delete = &doc.operations[2];
        assert_eq!(delete.operation_id, "delete_widgets_id");
        assert_eq!(delete.success_response().unwrap().status, "204");
        assert!(delete.success_response().unwrap().schema.is_none());
    }

    #[test]
    fn test_rejects_swagger() {
        let err = load_document("swagger: '2.0'\npaths: {}").unwrap_err();
        assert!(matches!(err, AppError::General(_)));
    }

    #[test]
    fn test_unknown_parameter_reference() {
        let yaml = r#"
openapi: 3.1.0
paths:
  /x:
    get:
      parameters:
        - $ref: '#/components/parameters/Nope'
      responses:
        '200': {description: ok}
"#;
        let err = load_document(yaml).unwrap_err();
        assert!(matches!(err, AppError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_derive_operation_id() {
        assert_eq!(derive_operation_id(HttpVerb::Get, "/users"), "get_users");
        assert_eq!(
            derive_operation_id(HttpVerb::Post, "/users/{id}/activate"),
            "post_users_id_activate"
        );
    }
}
