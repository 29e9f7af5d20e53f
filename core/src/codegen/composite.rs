#![deny(missing_docs)]

//! # Composite-Type Emitter
//!
//! Renders planned records as `serde` structs with an explicit `Default`
//! impl, and marks paginable records with the runtime `Paginated` trait.
//!
//! Required fields are plain values initialised to their type default;
//! optional fields are `Option<T>` and skipped when unset. Recursive fields
//! are boxed and always optional.

use crate::codegen::naming::string_literal;
use crate::codegen::types::TypeRef;
use crate::codegen::writer::CodeWriter;

const COMPOSITE_DERIVES: &str =
    "#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]";

/// One struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    /// Rust field name.
    pub ident: String,
    /// Property name on the wire.
    pub wire_name: String,
    /// Value type.
    pub ty: TypeRef,
    /// Whether the property is required.
    pub required: bool,
    /// Whether the value is boxed (recursive field).
    pub boxed: bool,
    /// Initialiser used by `Default` for required fields.
    pub default_expr: String,
    /// Doc comment text.
    pub description: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
}

impl FieldPlan {
    /// True if the field is held as `Option<_>`.
    pub fn is_optional(&self) -> bool {
        !self.required || self.boxed
    }

    /// Rust spelling of the field type.
    pub fn rust_type(&self) -> String {
        let inner = if self.boxed {
            format!("Box<{}>", self.ty.rust_type())
        } else {
            self.ty.rust_type()
        };
        if self.is_optional() {
            format!("Option<{}>", inner)
        } else {
            inner
        }
    }
}

/// Where a paginable record keeps its next link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPlan {
    /// Field holding the links record.
    pub links_ident: String,
    /// Whether that field is optional.
    pub links_optional: bool,
    /// Field of the links record holding the next link.
    pub next_ident: String,
    /// Whether that field is optional.
    pub next_optional: bool,
}

impl PaginationPlan {
    /// Expression yielding `Option<&str>` for the next link.
    pub fn next_link_expr(&self) -> String {
        let links = &self.links_ident;
        let next = &self.next_ident;
        let raw = match (self.links_optional, self.next_optional) {
            (true, true) => format!(
                "self.{}.as_ref().and_then(|links| links.{}.as_deref())",
                links, next
            ),
            (true, false) => format!(
                "self.{}.as_ref().map(|links| links.{}.as_str())",
                links, next
            ),
            (false, true) => format!("self.{}.{}.as_deref()", links, next),
            (false, false) => format!("Some(self.{}.{}.as_str())", links, next),
        };
        format!("{}.filter(|next| !next.is_empty())", raw)
    }
}

/// A planned record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePlan {
    /// Type name.
    pub name: String,
    /// Doc comment text.
    pub description: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
    /// Fields in declared order.
    pub fields: Vec<FieldPlan>,
    /// Set when the record carries `links.next`.
    pub pagination: Option<PaginationPlan>,
}

/// Renders the struct, its `Default` impl and, when paginable, `Paginated`.
pub fn render_composite(w: &mut CodeWriter, plan: &CompositePlan) {
    if let Some(description) = &plan.description {
        w.doc(description);
    }
    if plan.deprecated {
        w.line("#[deprecated]");
    }
    w.line(COMPOSITE_DERIVES);
    w.line("#[serde(default)]");
    w.block(format!("pub struct {}", plan.name), |w| {
        for field in &plan.fields {
            if let Some(description) = &field.description {
                w.doc(description);
            }
            if field.deprecated {
                w.line("#[deprecated]");
            }
            let mut serde_attrs = Vec::new();
            if field.ident != field.wire_name {
                serde_attrs.push(format!("rename = {}", string_literal(&field.wire_name)));
            }
            if field.is_optional() {
                serde_attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
            }
            if !serde_attrs.is_empty() {
                w.line(format!("#[serde({})]", serde_attrs.join(", ")));
            }
            w.line(format!("pub {}: {},", field.ident, field.rust_type()));
        }
    });
    w.blank();

    w.block(format!("impl Default for {}", plan.name), |w| {
        w.block("fn default() -> Self", |w| {
            w.block("Self", |w| {
                for field in &plan.fields {
                    let value = if field.is_optional() {
                        "None"
                    } else {
                        field.default_expr.as_str()
                    };
                    w.line(format!("{}: {},", field.ident, value));
                }
            });
        });
    });

    if let Some(pagination) = &plan.pagination {
        w.blank();
        w.block(format!("impl rt::Paginated for {}", plan.name), |w| {
            w.block("fn next_link(&self) -> Option<&str>", |w| {
                w.line(pagination.next_link_expr());
            });
        });
    }
}
