#![deny(missing_docs)]

//! # Operation Emitter
//!
//! Plans and renders one client method per operation.
//!
//! Every method follows the same contract: substitute path placeholders,
//! build the query, issue one request and decode the success body, all
//! inside the runtime retry wrapper.

use crate::codegen::naming::{parameter_identifier, string_literal, title_case};
use crate::codegen::registry::MethodName;
use crate::codegen::types::{TypeHint, TypeRef, TypeSink};
use crate::codegen::writer::CodeWriter;
use crate::error::{AppError, AppResult};
use crate::oas::document::{HttpVerb, Operation, Parameter};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A path or query parameter of a generated method.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamPlan {
    /// Rust argument name.
    pub ident: String,
    /// Name as declared (placeholder or query key).
    pub wire_name: String,
    /// Value type.
    pub ty: TypeRef,
    /// Whether the caller must supply it.
    pub required: bool,
    /// Deprecation marker.
    pub deprecated: bool,
}

impl ParamPlan {
    /// Spelling in the method signature.
    pub fn signature_type(&self) -> String {
        if self.required {
            self.ty.param_type()
        } else {
            format!("Option<{}>", self.ty.param_type())
        }
    }

    /// Expression turning the bound value into URI text.
    fn value_expr(&self) -> String {
        match self.ty {
            TypeRef::Sequence(_) => format!("rt::join_values({})", self.ident),
            _ => self.ident.clone(),
        }
    }
}

/// The request body argument.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlan {
    /// Payload type.
    pub ty: TypeRef,
    /// Whether the body must be supplied.
    pub required: bool,
}

/// A planned client method.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationPlan {
    /// Method identifier.
    pub method: String,
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Path template.
    pub path: String,
    /// Operation id as declared (or derived).
    pub operation_id: String,
    /// Summary for the doc comment.
    pub summary: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
    /// Path parameters in declared order.
    pub path_params: Vec<ParamPlan>,
    /// Request body.
    pub body: Option<BodyPlan>,
    /// Query parameters, required ones first.
    pub query_params: Vec<ParamPlan>,
    /// Success payload type, `None` when the response has no JSON body.
    pub response: Option<TypeRef>,
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([^}]+)}").expect("Invalid regex constant"))
}

/// Plans one operation under an already assigned method name.
pub fn plan_operation(
    op: &Operation,
    name: &MethodName,
    types: &mut impl TypeSink,
) -> AppResult<OperationPlan> {
    let display = op.display_name();
    let success = op
        .success_response()
        .ok_or_else(|| AppError::MissingSuccessResponse {
            operation: display.clone(),
        })?;

    let declared: HashSet<&str> = op.path_params.iter().map(|p| p.name.as_str()).collect();
    for caps in placeholder_regex().captures_iter(&op.path) {
        let placeholder = &caps[1];
        if !declared.contains(placeholder) {
            return Err(AppError::UnsupportedParameterShape {
                operation: display.clone(),
                parameter: placeholder.to_string(),
                reason: "path placeholder has no declared path parameter".into(),
            });
        }
    }

    let mut idents = HashSet::new();
    let mut path_params = Vec::with_capacity(op.path_params.len());
    for param in &op.path_params {
        path_params.push(plan_param(param, name, &display, &mut idents, types)?);
    }
    let mut query_params = Vec::with_capacity(op.query_params.len());
    for param in &op.query_params {
        query_params.push(plan_param(param, name, &display, &mut idents, types)?);
    }
    query_params.sort_by_key(|p| !p.required);

    let body = match &op.request_body {
        Some(body) => {
            let type_name = body
                .schema
                .title
                .as_deref()
                .map(title_case)
                .unwrap_or_else(|| format!("{}Request{}", name.base, name.suffix));
            Some(BodyPlan {
                ty: types.define(&body.schema, &TypeHint::uniform(type_name))?,
                required: body.required,
            })
        }
        None => None,
    };

    let response = match &success.schema {
        Some(schema) => {
            let type_name = schema
                .reference
                .as_deref()
                .map(title_case)
                .unwrap_or_else(|| format!("{}Response{}", name.base, name.suffix));
            Some(types.define(schema, &TypeHint::uniform(type_name))?)
        }
        None => None,
    };

    Ok(OperationPlan {
        method: name.ident(),
        verb: op.verb,
        path: op.path.clone(),
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        deprecated: op.deprecated,
        path_params,
        body,
        query_params,
        response,
    })
}

fn plan_param(
    param: &Parameter,
    name: &MethodName,
    operation: &str,
    idents: &mut HashSet<String>,
    types: &mut impl TypeSink,
) -> AppResult<ParamPlan> {
    let enum_name = format!("{}{}{}", name.base, title_case(&param.name), name.suffix);
    let ty = types.define(&param.schema, &TypeHint::uniform(enum_name))?;
    if !ty.is_uri_value() {
        return Err(AppError::UnsupportedParameterShape {
            operation: operation.to_string(),
            parameter: param.name.clone(),
            reason: format!("'{}' cannot be written into a URI", ty.rust_type()),
        });
    }

    let ident = parameter_identifier(&param.name);
    if !idents.insert(ident.clone()) {
        return Err(AppError::NamingConflict {
            name: ident,
            reason: format!("two parameters of '{}' map to this argument", operation),
        });
    }

    Ok(ParamPlan {
        ident,
        wire_name: param.name.clone(),
        ty,
        required: param.required,
        deprecated: param.deprecated,
    })
}

/// Renders the method inside the client `impl` block.
pub fn render_operation(w: &mut CodeWriter, plan: &OperationPlan) {
    if let Some(summary) = &plan.summary {
        w.doc(summary);
        w.line("///");
    }
    w.line(format!(
        "/// `{} {}` (`{}`)",
        plan.verb, plan.path, plan.operation_id
    ));
    let deprecated_params: Vec<String> = plan
        .path_params
        .iter()
        .chain(&plan.query_params)
        .filter(|p| p.deprecated)
        .map(|p| format!("`{}`", p.wire_name))
        .collect();
    if !deprecated_params.is_empty() {
        w.line("///");
        w.line(format!(
            "/// Deprecated parameters: {}.",
            deprecated_params.join(", ")
        ));
    }
    if plan.deprecated {
        w.line("#[deprecated]");
    }

    let response_type = plan
        .response
        .as_ref()
        .map(TypeRef::rust_type)
        .unwrap_or_else(|| "()".into());

    w.line(format!("pub fn {}(", plan.method));
    w.indent();
    w.line("&self,");
    for param in &plan.path_params {
        w.line(format!("{}: {},", param.ident, param.signature_type()));
    }
    if let Some(body) = &plan.body {
        let ty = body.ty.param_type();
        if body.required {
            w.line(format!("body: {},", ty));
        } else {
            w.line(format!("body: Option<{}>,", ty));
        }
    }
    for param in &plan.query_params {
        w.line(format!("{}: {},", param.ident, param.signature_type()));
    }
    w.line("observer: Option<&dyn rt::RequestObserver>,");
    w.line("retries: Option<u32>,");
    w.dedent();
    w.open(format!(") -> Result<{}, rt::ClientError>", response_type));

    w.open("rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, ||");
    render_body(w, plan);
    w.close("})");

    w.close("}");
}

fn render_body(w: &mut CodeWriter, plan: &OperationPlan) {
    let mut path = string_literal(&plan.path);
    for param in &plan.path_params {
        path.push_str(&format!(
            ".replace({}, &rt::encode_path_segment(&{}.to_string()))",
            string_literal(&format!("{{{}}}", param.wire_name)),
            param.value_expr()
        ));
    }
    w.line(format!("let path = {};", path));

    if plan.query_params.is_empty() {
        w.line("let query = rt::QueryString::new();");
    } else {
        w.line("let mut query = rt::QueryString::new();");
    }
    for param in &plan.query_params {
        let push = format!(
            "query.push({}, {});",
            string_literal(&param.wire_name),
            param.value_expr()
        );
        if param.required {
            w.line(push);
        } else {
            w.block(
                format!("if let Some({ident}) = {ident}", ident = param.ident),
                |w| w.line(push),
            );
        }
    }
    w.line("let uri = rt::build_uri(&self.base_url, &path, &query)?;");

    let new_request = format!(
        "rt::HttpRequest::new(rt::Method::{}, uri)",
        plan.verb.runtime_variant()
    );
    match &plan.body {
        None => w.line(format!("let request = {};", new_request)),
        Some(body) => {
            let arg = if body.ty.is_copy() { "&body" } else { "body" };
            if body.required {
                w.line(format!("let request = {}.with_json({})?;", new_request, arg));
            } else {
                w.line(format!("let mut request = {};", new_request));
                w.block("if let Some(body) = body", |w| {
                    w.line(format!("request = request.with_json({})?;", arg));
                });
            }
        }
    }

    if plan.response.is_some() {
        w.line("let response = rt::execute(&self.transport, &request, observer)?;");
        w.line("rt::decode_json(&response)");
    } else {
        w.line("rt::execute(&self.transport, &request, observer)?;");
        w.line("Ok(())");
    }
}
