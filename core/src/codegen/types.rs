#![deny(missing_docs)]

//! # Type Resolver
//!
//! Maps one schema node to the Rust type used to hold it.
//!
//! Named results (composites and enums) take their name from the node's
//! reference when it has one and from the caller's hint otherwise. The
//! resolver only names types; defining them is the driver's job.

use crate::codegen::naming::title_case;
use crate::error::{AppError, AppResult};
use crate::oas::schema::{Schema, SchemaKind};

/// Rust spelling of the opaque placeholder used for heterogeneous unions.
pub const OPAQUE_TYPE: &str = "serde_json::Value";

/// A resolved target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// `String`
    String,
    /// `bool`
    Boolean,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `Vec<T>`
    Sequence(Box<TypeRef>),
    /// A generated struct (or an alias of one).
    Composite(String),
    /// A generated enum.
    Enum(String),
    /// `serde_json::Value`
    Opaque,
}

/// Names to use when a node needs a new named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    /// Name for an inline object.
    pub object: String,
    /// Name for an inline multi-literal string.
    pub enumeration: String,
}

impl TypeHint {
    /// A hint that uses the same name for objects and enums.
    pub fn uniform(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            object: name.clone(),
            enumeration: name,
        }
    }
}

impl TypeRef {
    /// Owned Rust spelling (`Vec<Widget>`).
    pub fn rust_type(&self) -> String {
        match self {
            TypeRef::String => "String".into(),
            TypeRef::Boolean => "bool".into(),
            TypeRef::Int32 => "i32".into(),
            TypeRef::Int64 => "i64".into(),
            TypeRef::Float32 => "f32".into(),
            TypeRef::Float64 => "f64".into(),
            TypeRef::Sequence(inner) => format!("Vec<{}>", inner.rust_type()),
            TypeRef::Composite(name) | TypeRef::Enum(name) => name.clone(),
            TypeRef::Opaque => OPAQUE_TYPE.into(),
        }
    }

    /// Spelling as a method argument: borrowed unless the type is `Copy`.
    pub fn param_type(&self) -> String {
        match self {
            TypeRef::String => "&str".into(),
            TypeRef::Sequence(inner) => format!("&[{}]", inner.rust_type()),
            TypeRef::Composite(_) | TypeRef::Opaque => format!("&{}", self.rust_type()),
            _ => self.rust_type(),
        }
    }

    /// True when [`TypeRef::param_type`] passes the value by copy.
    pub fn is_copy(&self) -> bool {
        matches!(
            self,
            TypeRef::Boolean
                | TypeRef::Int32
                | TypeRef::Int64
                | TypeRef::Float32
                | TypeRef::Float64
                | TypeRef::Enum(_)
        )
    }

    /// Expression used to initialise a required field.
    pub fn default_expr(&self) -> String {
        match self {
            TypeRef::String => "String::new()".into(),
            TypeRef::Boolean => "false".into(),
            TypeRef::Int32 | TypeRef::Int64 => "0".into(),
            TypeRef::Float32 | TypeRef::Float64 => "0.0".into(),
            TypeRef::Sequence(_) => "Vec::new()".into(),
            TypeRef::Composite(name) | TypeRef::Enum(name) => format!("{}::default()", name),
            TypeRef::Opaque => format!("{}::Null", OPAQUE_TYPE),
        }
    }

    /// True if the type (or its sequence items) can be written as a URI value.
    pub fn is_uri_value(&self) -> bool {
        match self {
            TypeRef::Sequence(inner) => inner.is_scalar(),
            other => other.is_scalar(),
        }
    }

    fn is_scalar(&self) -> bool {
        !matches!(
            self,
            TypeRef::Sequence(_) | TypeRef::Composite(_) | TypeRef::Opaque
        )
    }
}

/// Resolves schemas while defining the named types they need.
pub trait TypeSink {
    /// Resolves `schema` and defines any inline composite or enum it names.
    fn define(&mut self, schema: &Schema, hint: &TypeHint) -> AppResult<TypeRef>;
}

/// Picks the alternative a `oneOf` collapses to, if any.
///
/// Alternatives collapse only when every one shares the first one's shape tag
/// and title. Nested shapes are not compared.
pub fn collapse_one_of(alternatives: &[Schema]) -> Option<&Schema> {
    let first = alternatives.first()?;
    let uniform = alternatives
        .iter()
        .all(|alt| alt.kind.tag() == first.kind.tag() && alt.title == first.title);
    uniform.then_some(first)
}

/// Hint for types nested inside the named schema `name` (`WidgetList` -> `WidgetListItem`).
pub fn item_hint(name: &str) -> TypeHint {
    TypeHint::uniform(format!("{}Item", title_case(name)))
}

/// Resolves a schema node to a [`TypeRef`].
///
/// Nodes inside a referenced array or `oneOf` are named after the reference
/// ([`item_hint`]), so every use site agrees with the component's alias.
pub fn resolve_type(schema: &Schema, hint: &TypeHint) -> AppResult<TypeRef> {
    let alias_hint;
    let hint = match (&schema.kind, &schema.reference) {
        (SchemaKind::Array(_) | SchemaKind::OneOf(_), Some(reference)) => {
            alias_hint = item_hint(reference);
            &alias_hint
        }
        _ => hint,
    };

    match &schema.kind {
        SchemaKind::Array(items) => Ok(TypeRef::Sequence(Box::new(resolve_type(items, hint)?))),
        SchemaKind::String { values } if values.len() >= 2 => Ok(TypeRef::Enum(
            schema
                .reference
                .as_deref()
                .map(title_case)
                .unwrap_or_else(|| hint.enumeration.clone()),
        )),
        SchemaKind::String { .. } => Ok(TypeRef::String),
        SchemaKind::Boolean => Ok(TypeRef::Boolean),
        SchemaKind::Integer { format } => Ok(match format.as_deref() {
            Some("int32") => TypeRef::Int32,
            _ => TypeRef::Int64,
        }),
        SchemaKind::Number { format } => Ok(match format.as_deref() {
            Some("float") => TypeRef::Float32,
            _ => TypeRef::Float64,
        }),
        SchemaKind::Object(_) => Ok(TypeRef::Composite(
            schema
                .reference
                .as_deref()
                .map(title_case)
                .unwrap_or_else(|| hint.object.clone()),
        )),
        SchemaKind::OneOf(alternatives) if alternatives.is_empty() => {
            Err(AppError::UnsupportedSchemaShape {
                location: hint.object.clone(),
                reason: "oneOf without alternatives".into(),
            })
        }
        SchemaKind::OneOf(alternatives) => match collapse_one_of(alternatives) {
            Some(first) => resolve_type(first, hint),
            None => Ok(TypeRef::Opaque),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::schema::ObjectShape;

    fn string(values: &[&str]) -> Schema {
        Schema::new(SchemaKind::String {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    fn titled(kind: SchemaKind, title: &str) -> Schema {
        let mut schema = Schema::new(kind);
        schema.title = Some(title.into());
        schema
    }

    #[test]
    fn test_primitives() {
        let hint = TypeHint::uniform("X");
        let int32 = Schema::new(SchemaKind::Integer {
            format: Some("int32".into()),
        });
        let float = Schema::new(SchemaKind::Number {
            format: Some("float".into()),
        });
        let double = Schema::new(SchemaKind::Number { format: None });
        assert_eq!(resolve_type(&int32, &hint).unwrap(), TypeRef::Int32);
        assert_eq!(resolve_type(&float, &hint).unwrap(), TypeRef::Float32);
        assert_eq!(resolve_type(&double, &hint).unwrap(), TypeRef::Float64);
        assert_eq!(resolve_type(&string(&["only"]), &hint).unwrap(), TypeRef::String);
    }

    #[test]
    fn test_named_types_prefer_reference() {
        let hint = TypeHint {
            object: "Owner".into(),
            enumeration: "OwnerColor".into(),
        };
        assert_eq!(
            resolve_type(&string(&["RED", "GREEN"]), &hint).unwrap(),
            TypeRef::Enum("OwnerColor".into())
        );

        let mut referenced = string(&["RED", "GREEN"]);
        referenced.reference = Some("color".into());
        assert_eq!(
            resolve_type(&referenced, &hint).unwrap(),
            TypeRef::Enum("Color".into())
        );

        let mut object = Schema::new(SchemaKind::Object(ObjectShape::default()));
        assert_eq!(
            resolve_type(&object, &hint).unwrap(),
            TypeRef::Composite("Owner".into())
        );
        object.reference = Some("Widget".into());
        let array = Schema::new(SchemaKind::Array(Box::new(object)));
        assert_eq!(
            resolve_type(&array, &hint).unwrap().rust_type(),
            "Vec<Widget>"
        );
    }

    #[test]
    fn test_referenced_array_uses_item_hint() {
        let mut items = Schema::new(SchemaKind::Object(ObjectShape::default()));
        items.title = Some("Entry".into());
        let mut list = Schema::new(SchemaKind::Array(Box::new(items)));
        list.reference = Some("entry_list".into());
        assert_eq!(
            resolve_type(&list, &TypeHint::uniform("Owner")).unwrap(),
            TypeRef::Sequence(Box::new(TypeRef::Composite("EntryListItem".into())))
        );
    }

    #[test]
    fn test_one_of_collapsing() {
        let hint = TypeHint::uniform("X");
        let homogeneous = Schema::new(SchemaKind::OneOf(vec![
            titled(SchemaKind::Integer { format: None }, "Id"),
            titled(
                SchemaKind::Integer {
                    format: Some("int32".into()),
                },
                "Id",
            ),
        ]));
        assert_eq!(resolve_type(&homogeneous, &hint).unwrap(), TypeRef::Int64);

        let heterogeneous = Schema::new(SchemaKind::OneOf(vec![
            string(&[]),
            Schema::new(SchemaKind::Integer { format: None }),
        ]));
        assert_eq!(resolve_type(&heterogeneous, &hint).unwrap(), TypeRef::Opaque);

        let titles_differ = Schema::new(SchemaKind::OneOf(vec![
            titled(SchemaKind::Boolean, "A"),
            titled(SchemaKind::Boolean, "B"),
        ]));
        assert_eq!(resolve_type(&titles_differ, &hint).unwrap(), TypeRef::Opaque);

        let empty = Schema::new(SchemaKind::OneOf(Vec::new()));
        assert!(matches!(
            resolve_type(&empty, &hint),
            Err(AppError::UnsupportedSchemaShape { .. })
        ));
    }

    #[test]
    fn test_spellings() {
        let seq = TypeRef::Sequence(Box::new(TypeRef::Enum("Color".into())));
        assert_eq!(seq.param_type(), "&[Color]");
        assert_eq!(seq.default_expr(), "Vec::new()");
        assert!(seq.is_uri_value());
        assert_eq!(TypeRef::String.param_type(), "&str");
        assert_eq!(TypeRef::Enum("Color".into()).param_type(), "Color");
        assert_eq!(
            TypeRef::Composite("Widget".into()).default_expr(),
            "Widget::default()"
        );
        assert_eq!(TypeRef::Opaque.default_expr(), "serde_json::Value::Null");
        assert!(!TypeRef::Composite("Widget".into()).is_uri_value());
        assert!(!TypeRef::Sequence(Box::new(TypeRef::Opaque)).is_uri_value());
    }
}
