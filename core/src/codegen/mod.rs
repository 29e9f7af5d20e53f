#![deny(missing_docs)]

//! # Client Generation
//!
//! The document driver. Generation runs in two phases:
//!
//! 1. **Planning**: reserve every component name, walk the named schemas
//!    (alphabetically) and then the operations (by path, then declared
//!    order), assigning names and resolving types. Every fatal check happens
//!    here.
//! 2. **Rendering**: turn the plan into one source unit. Rendering cannot
//!    fail on document content.
//!
//! - **naming**: Identifier policy.
//! - **types**: Type resolver.
//! - **registry**: Named-type, enum and method-name registries.
//! - **composite** / **enums** / **operations**: Emitters.
//! - **writer**: Indentation-aware string builder.

pub mod composite;
pub mod enums;
pub mod naming;
pub mod operations;
pub mod registry;
pub mod types;
pub mod writer;

use crate::error::{AppError, AppResult};
use crate::oas::document::ApiDocument;
use crate::oas::schema::{ObjectShape, Schema, SchemaKind};
use composite::{render_composite, CompositePlan, FieldPlan, PaginationPlan};
use enums::{plan_enum, render_enum, EnumPlan};
use naming::{is_reserved_type_name, string_literal, title_case, valid_identifier};
use operations::{plan_operation, render_operation, OperationPlan};
use registry::{EnumRegistry, MethodNameRegistry, NamedTypeRegistry, Registration};
use std::collections::{HashMap, HashSet};
use types::{collapse_one_of, item_hint, resolve_type, TypeHint, TypeRef, TypeSink};
use writer::CodeWriter;

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Name of the generated client struct.
    pub client_name: String,
    /// Crate path the generated code imports as `rt`.
    pub runtime_crate: String,
    /// Document name quoted in the generated header.
    pub source_name: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            client_name: "ApiClient".into(),
            runtime_crate: "oasgen_runtime".into(),
            source_name: "openapi.yaml".into(),
        }
    }
}

impl GeneratorOptions {
    /// Rejects client names and runtime paths the generated unit cannot use.
    pub fn validate(&self) -> AppResult<()> {
        if self.client_name.is_empty() || title_case(&self.client_name) != self.client_name {
            return Err(AppError::General(format!(
                "Client name '{}' is not an UpperCamelCase identifier",
                self.client_name
            )));
        }
        if is_reserved_type_name(&self.client_name) {
            return Err(AppError::General(format!(
                "Client name '{}' is reserved",
                self.client_name
            )));
        }
        let valid_path = self
            .runtime_crate
            .split("::")
            .all(|segment| !segment.is_empty() && valid_identifier(segment) == segment);
        if !valid_path {
            return Err(AppError::General(format!(
                "Runtime crate '{}' is not a valid path",
                self.runtime_crate
            )));
        }
        Ok(())
    }
}

/// A component schema emitted as `pub type Name = ...;`.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasPlan {
    /// Alias name.
    pub name: String,
    /// Aliased type.
    pub ty: TypeRef,
    /// Doc comment text.
    pub description: Option<String>,
}

/// Everything the renderer needs, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPlan {
    /// Type aliases.
    pub aliases: Vec<AliasPlan>,
    /// Records, nested ones before their owners.
    pub composites: Vec<CompositePlan>,
    /// Enums.
    pub enums: Vec<EnumPlan>,
    /// Client methods in walk order.
    pub operations: Vec<OperationPlan>,
}

/// Generates the client source unit for a loaded document.
pub fn generate(document: &ApiDocument, options: &GeneratorOptions) -> AppResult<String> {
    options.validate()?;
    let plan = Generator::new(document, options).plan()?;
    Ok(render(&plan, document, options))
}

/// Planning state for one run.
pub struct Generator<'a> {
    document: &'a ApiDocument,
    options: &'a GeneratorOptions,
    components: HashMap<&'a str, &'a Schema>,
    named: NamedTypeRegistry,
    enums: EnumRegistry,
    methods: MethodNameRegistry,
    plan: ClientPlan,
}

impl<'a> Generator<'a> {
    /// Creates a generator with empty registries.
    pub fn new(document: &'a ApiDocument, options: &'a GeneratorOptions) -> Self {
        let components = document
            .schemas
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
            .collect();
        Self {
            document,
            options,
            components,
            named: NamedTypeRegistry::new(),
            enums: EnumRegistry::new(),
            methods: MethodNameRegistry::new(),
            plan: ClientPlan::default(),
        }
    }

    /// Runs the planning phase.
    pub fn plan(mut self) -> AppResult<ClientPlan> {
        let document = self.document;

        for (name, schema) in &document.schemas {
            self.reserve_component(name, schema)?;
        }

        for (name, schema) in &document.schemas {
            let type_name = title_case(name);
            match component_kind(schema) {
                ComponentKind::Composite => self.define_composite(&type_name, schema)?,
                ComponentKind::Enum(values) => self.define_enum(
                    &type_name,
                    values,
                    schema.description.clone(),
                    schema.deprecated,
                )?,
                ComponentKind::Alias => self.define_alias(name, &type_name, schema)?,
            }
        }

        for op in &document.operations {
            let name = self.methods.assign(op.verb, &op.operation_id, &op.path)?;
            let planned = plan_operation(op, &name, &mut self)?;
            tracing::debug!("Planned {} as '{}'", op.display_name(), planned.method);
            self.plan.operations.push(planned);
        }

        box_recursive_fields(&mut self.plan.composites);

        tracing::info!(
            "Planned {} aliases, {} structs, {} enums and {} methods",
            self.plan.aliases.len(),
            self.plan.composites.len(),
            self.plan.enums.len(),
            self.plan.operations.len()
        );
        Ok(self.plan)
    }

    fn reserve_component(&mut self, name: &str, schema: &Schema) -> AppResult<()> {
        let type_name = title_case(name);
        self.check_type_name(&type_name)?;
        match component_kind(schema) {
            ComponentKind::Enum(values) => {
                if self.named.contains(&type_name) {
                    return Err(conflict(&type_name, "enum collides with a struct or alias"));
                }
                self.enums.reserve(&type_name, values)
            }
            ComponentKind::Composite | ComponentKind::Alias => {
                if self.enums.contains(&type_name) {
                    return Err(conflict(&type_name, "struct or alias collides with an enum"));
                }
                self.named.reserve(&type_name, schema)
            }
        }
    }

    fn check_type_name(&self, name: &str) -> AppResult<()> {
        if is_reserved_type_name(name) {
            return Err(conflict(name, "reserved by the generated module"));
        }
        if name == self.options.client_name {
            return Err(conflict(name, "used by the client type"));
        }
        Ok(())
    }

    fn accepts_name(&self, name: &str, schema: &Schema) -> bool {
        self.check_type_name(name).is_ok()
            && !self.enums.contains(name)
            && self.named.accepts(name, schema)
    }

    fn define_alias(&mut self, raw_name: &str, type_name: &str, schema: &Schema) -> AppResult<()> {
        if self.named.register(type_name, schema)? == Registration::Existing {
            return Ok(());
        }
        let ty = self.define(schema, &item_hint(raw_name))?;
        tracing::debug!("Alias {} = {}", type_name, ty.rust_type());
        self.plan.aliases.push(AliasPlan {
            name: type_name.to_string(),
            ty,
            description: schema.description.clone(),
        });
        Ok(())
    }

    fn define_enum(
        &mut self,
        name: &str,
        values: &[String],
        description: Option<String>,
        deprecated: bool,
    ) -> AppResult<()> {
        self.check_type_name(name)?;
        if self.named.contains(name) {
            return Err(conflict(name, "enum collides with a struct or alias"));
        }
        if self.enums.register(name, values)? == Registration::New {
            tracing::debug!("Enum {} with {} members", name, values.len());
            self.plan
                .enums
                .push(plan_enum(name, values, description, deprecated));
        }
        Ok(())
    }

    fn define_composite(&mut self, name: &str, schema: &Schema) -> AppResult<()> {
        self.check_type_name(name)?;
        if self.enums.contains(name) {
            return Err(conflict(name, "struct collides with an enum"));
        }
        if self.named.register(name, schema)? == Registration::Existing {
            return Ok(());
        }
        let Some(shape) = schema.as_object() else {
            return Ok(());
        };

        let mut fields = Vec::with_capacity(shape.properties.len());
        let mut idents = HashSet::new();
        for (property, property_schema) in &shape.properties {
            let hint = TypeHint {
                object: self.nested_object_name(name, property, property_schema)?,
                enumeration: format!("{}{}", name, title_case(property)),
            };
            let ty = self.define(property_schema, &hint)?;

            let ident = valid_identifier(property);
            if !idents.insert(ident.clone()) {
                return Err(conflict(
                    &format!("{}.{}", name, ident),
                    "two properties map to this field",
                ));
            }

            let default_expr = match property_schema.literals() {
                Some([single]) => format!("String::from({})", string_literal(single)),
                _ => ty.default_expr(),
            };
            fields.push(FieldPlan {
                ident,
                wire_name: property.clone(),
                ty,
                required: shape.is_required(property),
                boxed: false,
                default_expr,
                description: property_schema.description.clone(),
                deprecated: property_schema.deprecated,
            });
        }

        let pagination = self.pagination_for(shape, &fields);
        if pagination.is_some() {
            tracing::debug!("{} is paginable", name);
        }
        self.plan.composites.push(CompositePlan {
            name: name.to_string(),
            description: schema.description.clone(),
            deprecated: schema.deprecated,
            fields,
            pagination,
        });
        Ok(())
    }

    /// Name for an anonymous object nested under `owner.property`.
    ///
    /// `Property` when free (or held by the same shape). A different shape
    /// already holding `Property` does not abort the run: the object falls
    /// back to `OwnerProperty`, and only a clash on that name as well is a
    /// `NamingConflict`.
    fn nested_object_name(&self, owner: &str, property: &str, schema: &Schema) -> AppResult<String> {
        let candidate = title_case(property);
        let Some(inline) = inline_object(schema) else {
            return Ok(candidate);
        };
        if self.accepts_name(&candidate, inline) {
            return Ok(candidate);
        }
        let qualified = format!("{}{}", owner, candidate);
        if self.accepts_name(&qualified, inline) {
            tracing::debug!(
                "Nested object {}.{} qualified as {}",
                owner,
                property,
                qualified
            );
            return Ok(qualified);
        }
        Err(conflict(
            &qualified,
            "nested object name is held by a different schema",
        ))
    }

    fn pagination_for(&self, shape: &ObjectShape, fields: &[FieldPlan]) -> Option<PaginationPlan> {
        let links_field = fields.iter().find(|f| f.wire_name == "links")?;
        if !matches!(links_field.ty, TypeRef::Composite(_)) {
            return None;
        }
        let links_schema = shape.properties.get("links")?;
        let links_shape = match &links_schema.reference {
            Some(reference) => self.components.get(reference.as_str())?.as_object()?,
            None => links_schema.as_object()?,
        };
        let next_schema = links_shape.properties.get("next")?;
        if resolve_type(next_schema, &TypeHint::uniform("Next")).ok()? != TypeRef::String {
            tracing::debug!("links.next is not a string; not paginable");
            return None;
        }
        Some(PaginationPlan {
            links_ident: links_field.ident.clone(),
            links_optional: links_field.is_optional(),
            next_ident: valid_identifier("next"),
            next_optional: !links_shape.is_required("next"),
        })
    }

    /// Defines the inline composites and enums `ty` names inside `schema`.
    fn define_inline(&mut self, schema: &Schema, ty: &TypeRef) -> AppResult<()> {
        match (&schema.kind, ty) {
            (SchemaKind::OneOf(alternatives), _) => {
                if let Some(first) = collapse_one_of(alternatives) {
                    self.define_inline(first, ty)?;
                }
            }
            (SchemaKind::Array(items), TypeRef::Sequence(inner)) => {
                self.define_inline(items, inner)?;
            }
            // Referenced objects and enums are emitted from their components.
            _ if schema.reference.is_some() => {}
            (SchemaKind::Object(_), TypeRef::Composite(name)) => {
                self.define_composite(name, schema)?;
            }
            (SchemaKind::String { values }, TypeRef::Enum(name)) => {
                self.define_enum(name, values, schema.description.clone(), schema.deprecated)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl TypeSink for Generator<'_> {
    fn define(&mut self, schema: &Schema, hint: &TypeHint) -> AppResult<TypeRef> {
        let ty = resolve_type(schema, hint)?;
        self.define_inline(schema, &ty)?;
        Ok(ty)
    }
}

enum ComponentKind<'s> {
    Composite,
    Enum(&'s [String]),
    Alias,
}

fn component_kind(schema: &Schema) -> ComponentKind<'_> {
    if schema.reference.is_some() {
        return ComponentKind::Alias;
    }
    match &schema.kind {
        SchemaKind::Object(_) => ComponentKind::Composite,
        SchemaKind::String { values } if values.len() >= 2 => ComponentKind::Enum(values),
        _ => ComponentKind::Alias,
    }
}

/// The inline object a property would define, looking through arrays and
/// collapsing unions.
fn inline_object(schema: &Schema) -> Option<&Schema> {
    if schema.reference.is_some() {
        return None;
    }
    match &schema.kind {
        SchemaKind::Object(_) => Some(schema),
        SchemaKind::Array(items) => inline_object(items),
        SchemaKind::OneOf(alternatives) => collapse_one_of(alternatives).and_then(inline_object),
        _ => None,
    }
}

/// Boxes every field whose type can reach its owner through non-sequence
/// struct fields, which would otherwise have infinite size.
fn box_recursive_fields(composites: &mut [CompositePlan]) {
    let edges: HashMap<String, Vec<String>> = composites
        .iter()
        .map(|plan| {
            let targets = plan
                .fields
                .iter()
                .filter_map(|field| match &field.ty {
                    TypeRef::Composite(target) => Some(target.clone()),
                    _ => None,
                })
                .collect();
            (plan.name.clone(), targets)
        })
        .collect();

    for plan in composites.iter_mut() {
        for field in plan.fields.iter_mut() {
            if let TypeRef::Composite(target) = &field.ty {
                if reaches(&edges, target, &plan.name) {
                    tracing::debug!("Boxing recursive field {}.{}", plan.name, field.ident);
                    field.boxed = true;
                }
            }
        }
        if let Some(pagination) = plan.pagination.as_mut() {
            if let Some(links) = plan
                .fields
                .iter()
                .find(|field| field.ident == pagination.links_ident)
            {
                pagination.links_optional = links.is_optional();
            }
        }
    }
}

fn reaches(edges: &HashMap<String, Vec<String>>, from: &str, to: &str) -> bool {
    let mut stack = vec![from];
    let mut visited = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(targets) = edges.get(current) {
            stack.extend(targets.iter().map(String::as_str));
        }
    }
    false
}

fn conflict(name: &str, reason: &str) -> AppError {
    AppError::NamingConflict {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Runs the rendering phase.
pub fn render(plan: &ClientPlan, document: &ApiDocument, options: &GeneratorOptions) -> String {
    let title = document
        .title
        .as_deref()
        .and_then(|t| t.lines().next())
        .unwrap_or("the API");

    let mut w = CodeWriter::new();
    w.line(format!("//! Generated client for {}.", title));
    w.line("//!");
    w.line(format!(
        "//! Generated by `oasgen` from `{}`. Do not edit by hand.",
        options.source_name
    ));
    w.blank();
    w.line("#![allow(clippy::all, deprecated)]");
    w.blank();
    w.line(format!("use {} as rt;", options.runtime_crate));

    for alias in &plan.aliases {
        w.blank();
        if let Some(description) = &alias.description {
            w.doc(description);
        }
        w.line(format!("pub type {} = {};", alias.name, alias.ty.rust_type()));
    }
    for composite in &plan.composites {
        w.blank();
        render_composite(&mut w, composite);
    }
    for enumeration in &plan.enums {
        w.blank();
        render_enum(&mut w, enumeration);
    }
    w.blank();
    render_client(&mut w, plan, options, title);
    w.finish()
}

fn render_client(w: &mut CodeWriter, plan: &ClientPlan, options: &GeneratorOptions, title: &str) {
    let client = &options.client_name;

    w.doc(&format!(
        "Client for {}.\n\nEvery method retries failed attempts; `retries: None` uses the default budget.",
        title
    ));
    w.line("#[derive(Debug, Clone)]");
    w.block(format!("pub struct {}<T = rt::UreqTransport>", client), |w| {
        w.line("base_url: rt::Url,");
        w.line("transport: T,");
    });
    w.blank();

    w.block(format!("impl {}<rt::UreqTransport>", client), |w| {
        w.line("/// Creates a client for `base_url` over the default transport.");
        w.block(
            "pub fn connect(base_url: &str) -> Result<Self, rt::ClientError>",
            |w| w.line("Ok(Self::new(rt::Url::parse(base_url)?, rt::UreqTransport::new()))"),
        );
    });
    w.blank();

    w.block(format!("impl<T: rt::Transport> {}<T>", client), |w| {
        w.line("/// Creates a client over an explicit transport.");
        w.block("pub fn new(base_url: rt::Url, transport: T) -> Self", |w| {
            w.line("Self { base_url, transport }");
        });
        w.blank();
        w.line("/// The address every path is resolved against.");
        w.block("pub fn base_url(&self) -> &rt::Url", |w| {
            w.line("&self.base_url");
        });
        w.blank();
        w.line("/// Fetches the page after `page`, or `None` when it has no next link.");
        w.line("pub fn next_page<R>(");
        w.indent();
        w.line("&self,");
        w.line("page: &R,");
        w.line("observer: Option<&dyn rt::RequestObserver>,");
        w.line("retries: Option<u32>,");
        w.dedent();
        w.line(") -> Result<Option<R>, rt::ClientError>");
        w.line("where");
        w.indent();
        w.line("R: rt::Paginated + serde::de::DeserializeOwned,");
        w.dedent();
        w.line("{");
        w.indent();
        w.open("rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, ||");
        w.line("rt::fetch_next_page(&self.transport, &self.base_url, page, observer)");
        w.close("})");
        w.close("}");

        for operation in &plan.operations {
            w.blank();
            render_operation(w, operation);
        }
    });
}
