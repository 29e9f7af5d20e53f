#![deny(missing_docs)]

//! # Schema Model
//!
//! The generator's view of a schema: one tagged union with exactly the
//! shapes the emitters understand, lowered once from the raw shims.
//!
//! Lowering rules:
//! - `type` lists drop `null`; exactly one type must remain.
//! - A missing `type` is inferred from `properties`, `items`, `enum`, `oneOf`.
//! - `anyOf` lowers like `oneOf`; a single-member `allOf` lowers as its member.
//! - `$ref` lowers shallowly: it keeps the reference name and the target's
//!   title, and a referenced object carries no properties.

use crate::error::{AppError, AppResult};
use crate::oas::refs::resolve_component;
use crate::oas::shims::{ShimSchema, ShimType};
use indexmap::IndexMap;
use serde_yaml::Value;

/// A lowered schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// The shape of the node.
    pub kind: SchemaKind,
    /// Name of the component this node refers to, if it is a `$ref`.
    pub reference: Option<String>,
    /// `title` hint.
    pub title: Option<String>,
    /// `description`, rendered as documentation.
    pub description: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
}

/// The supported schema shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// A string, optionally restricted to literal values.
    String {
        /// Allowed literals in declared order (empty when unrestricted).
        values: Vec<String>,
    },
    /// A boolean.
    Boolean,
    /// An integer.
    Integer {
        /// `int32` / `int64` hint.
        format: Option<String>,
    },
    /// A floating point number.
    Number {
        /// `float` / `double` hint.
        format: Option<String>,
    },
    /// A homogeneous array.
    Array(Box<Schema>),
    /// A record.
    Object(ObjectShape),
    /// A union of alternatives.
    OneOf(Vec<Schema>),
}

/// Properties of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    /// Properties in declared order.
    pub properties: IndexMap<String, Schema>,
    /// Names of the required properties.
    pub required: Vec<String>,
}

impl ObjectShape {
    /// Returns true if the property must be present.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

impl SchemaKind {
    /// Name of the shape, used for `oneOf` collapsing and messages.
    pub fn tag(&self) -> &'static str {
        match self {
            SchemaKind::String { .. } => "string",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Integer { .. } => "integer",
            SchemaKind::Number { .. } => "number",
            SchemaKind::Array(_) => "array",
            SchemaKind::Object(_) => "object",
            SchemaKind::OneOf(_) => "oneOf",
        }
    }
}

impl Schema {
    /// Creates an inline node of the given shape.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            reference: None,
            title: None,
            description: None,
            deprecated: false,
        }
    }

    /// Returns the object shape if this node is an object.
    pub fn as_object(&self) -> Option<&ObjectShape> {
        match &self.kind {
            SchemaKind::Object(shape) => Some(shape),
            _ => None,
        }
    }

    /// Returns the literal values if this is a restricted string.
    pub fn literals(&self) -> Option<&[String]> {
        match &self.kind {
            SchemaKind::String { values } if !values.is_empty() => Some(values),
            _ => None,
        }
    }

    /// Structural equality: shape, reference and title.
    ///
    /// Descriptions and deprecation markers are ignored, and properties are
    /// compared regardless of declaration order.
    pub fn same_shape(&self, other: &Schema) -> bool {
        if self.reference != other.reference || self.title != other.title {
            return false;
        }
        match (&self.kind, &other.kind) {
            (SchemaKind::String { values: a }, SchemaKind::String { values: b }) => a == b,
            (SchemaKind::Boolean, SchemaKind::Boolean) => true,
            (SchemaKind::Integer { format: a }, SchemaKind::Integer { format: b }) => a == b,
            (SchemaKind::Number { format: a }, SchemaKind::Number { format: b }) => a == b,
            (SchemaKind::Array(a), SchemaKind::Array(b)) => a.same_shape(b),
            (SchemaKind::Object(a), SchemaKind::Object(b)) => {
                let mut required_a = a.required.clone();
                let mut required_b = b.required.clone();
                required_a.sort();
                required_b.sort();
                required_a == required_b
                    && a.properties.len() == b.properties.len()
                    && a.properties.iter().all(|(name, schema)| {
                        b.properties
                            .get(name)
                            .is_some_and(|other| schema.same_shape(other))
                    })
            }
            (SchemaKind::OneOf(a), SchemaKind::OneOf(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }
}

/// Lowers shims into [`Schema`] nodes against the document's named schemas.
pub struct SchemaLowering<'a> {
    components: &'a IndexMap<String, ShimSchema>,
}

impl<'a> SchemaLowering<'a> {
    /// Creates a lowering context over `components.schemas`.
    pub fn new(components: &'a IndexMap<String, ShimSchema>) -> Self {
        Self { components }
    }

    /// Lowers one schema. `location` is used in error messages.
    pub fn lower(&self, shim: &ShimSchema, location: &str) -> AppResult<Schema> {
        self.lower_inner(shim, location, &mut Vec::new())
    }

    fn lower_inner(
        &self,
        shim: &ShimSchema,
        location: &str,
        stack: &mut Vec<String>,
    ) -> AppResult<Schema> {
        if let Some(reference) = &shim.reference {
            return self.lower_ref(reference, location, stack);
        }

        if let Some(members) = &shim.all_of {
            let [member] = members.as_slice() else {
                return Err(unsupported(location, "allOf with more than one member"));
            };
            let mut schema = self.lower_inner(member, location, stack)?;
            if shim.description.is_some() {
                schema.description = shim.description.clone();
            }
            schema.deprecated |= shim.deprecated;
            return Ok(schema);
        }

        let kind = self.lower_kind(shim, location, stack)?;
        Ok(Schema {
            kind,
            reference: None,
            title: shim.title.clone(),
            description: shim.description.clone(),
            deprecated: shim.deprecated,
        })
    }

    fn lower_kind(
        &self,
        shim: &ShimSchema,
        location: &str,
        stack: &mut Vec<String>,
    ) -> AppResult<SchemaKind> {
        if let Some(alternatives) = shim.one_of.as_ref().or(shim.any_of.as_ref()) {
            let mut lowered = Vec::with_capacity(alternatives.len());
            for (index, alternative) in alternatives.iter().enumerate() {
                let alt_location = format!("{}.oneOf[{}]", location, index);
                lowered.push(self.lower_inner(alternative, &alt_location, stack)?);
            }
            return Ok(SchemaKind::OneOf(lowered));
        }

        let Some(type_name) = infer_type(shim, location)? else {
            return Err(unsupported(location, "no type could be determined"));
        };

        match type_name.as_str() {
            "string" => Ok(SchemaKind::String {
                values: string_literals(shim.enum_values.as_deref()),
            }),
            "boolean" => Ok(SchemaKind::Boolean),
            "integer" => Ok(SchemaKind::Integer {
                format: shim.format.clone(),
            }),
            "number" => Ok(SchemaKind::Number {
                format: shim.format.clone(),
            }),
            "array" => {
                let items = shim
                    .items
                    .as_deref()
                    .ok_or_else(|| unsupported(location, "array without items"))?;
                let item_location = format!("{}[]", location);
                Ok(SchemaKind::Array(Box::new(self.lower_inner(
                    items,
                    &item_location,
                    stack,
                )?)))
            }
            "object" => {
                let mut properties = IndexMap::new();
                for (name, property) in &shim.properties {
                    let property_location = format!("{}.{}", location, name);
                    properties.insert(
                        name.clone(),
                        self.lower_inner(property, &property_location, stack)?,
                    );
                }
                Ok(SchemaKind::Object(ObjectShape {
                    properties,
                    required: shim.required.clone(),
                }))
            }
            other => Err(unsupported(location, format!("type '{}'", other))),
        }
    }

    fn lower_ref(
        &self,
        reference: &str,
        location: &str,
        stack: &mut Vec<String>,
    ) -> AppResult<Schema> {
        let (name, target) = resolve_component(reference, "schemas", self.components)?;
        if stack.contains(&name) {
            return Err(unsupported(
                location,
                format!("reference cycle through '{}'", name),
            ));
        }

        let mut schema = if is_plain_object(target) {
            Schema {
                kind: SchemaKind::Object(ObjectShape::default()),
                reference: None,
                title: target.title.clone(),
                description: target.description.clone(),
                deprecated: target.deprecated,
            }
        } else {
            stack.push(name.clone());
            let lowered = self.lower_inner(target, &name, stack);
            stack.pop();
            lowered?
        };

        // In a chain of references the innermost name wins.
        if schema.reference.is_none() {
            schema.reference = Some(name);
        }
        Ok(schema)
    }
}

fn unsupported(location: &str, reason: impl Into<String>) -> AppError {
    AppError::UnsupportedSchemaShape {
        location: location.to_string(),
        reason: reason.into(),
    }
}

fn is_plain_object(shim: &ShimSchema) -> bool {
    shim.reference.is_none()
        && shim.all_of.is_none()
        && shim.one_of.is_none()
        && shim.any_of.is_none()
        && matches!(infer_type(shim, ""), Ok(Some(t)) if t == "object")
}

/// Determines the single non-null type of a schema, inferring it when absent.
fn infer_type(shim: &ShimSchema, location: &str) -> AppResult<Option<String>> {
    match &shim.schema_type {
        Some(ShimType::Single(t)) => Ok(Some(t.clone())),
        Some(ShimType::Many(types)) => {
            let non_null: Vec<&String> = types.iter().filter(|t| *t != "null").collect();
            match non_null.as_slice() {
                [single] => Ok(Some((*single).clone())),
                _ => Err(unsupported(
                    location,
                    format!("type list {:?} is not a single type", types),
                )),
            }
        }
        None if !shim.properties.is_empty() => Ok(Some("object".into())),
        None if shim.items.is_some() => Ok(Some("array".into())),
        None if shim
            .enum_values
            .as_ref()
            .is_some_and(|values| values.iter().all(|v| matches!(v, Value::String(_) | Value::Null))) =>
        {
            Ok(Some("string".into()))
        }
        None => Ok(None),
    }
}

fn string_literals(values: Option<&[Value]>) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::shims::parse_shim_document;

    fn components(yaml: &str) -> IndexMap<String, ShimSchema> {
        parse_shim_document(yaml)
            .unwrap()
            .components
            .unwrap()
            .schemas
    }

    const DOC: &str = r#"
openapi: 3.1.0
paths: {}
components:
  schemas:
    Color:
      type: string
      enum: [RED, GREEN]
    Widget:
      type: object
      required: [id]
      properties:
        id: {type: string}
        color: {$ref: '#/components/schemas/Color'}
        size: {type: [integer, 'null'], format: int32}
        parent: {$ref: '#/components/schemas/Widget'}
    Loop:
      type: array
      items: {$ref: '#/components/schemas/Loop'}
    Mixed:
      type: [string, integer]
    Untyped:
      description: anything
"#;

    #[test]
    fn test_lower_object_with_refs() {
        let schemas = components(DOC);
        let lowering = SchemaLowering::new(&schemas);
        let widget = lowering.lower(&schemas["Widget"], "Widget").unwrap();
        let shape = widget.as_object().unwrap();

        assert!(shape.is_required("id"));
        assert!(!shape.is_required("color"));

        let color = &shape.properties["color"];
        assert_eq!(color.reference.as_deref(), Some("Color"));
        assert_eq!(color.literals().unwrap(), &["RED", "GREEN"]);

        let size = &shape.properties["size"];
        assert_eq!(
            size.kind,
            SchemaKind::Integer {
                format: Some("int32".into())
            }
        );

        // Self reference through an object is shallow, not a cycle.
        let parent = &shape.properties["parent"];
        assert_eq!(parent.reference.as_deref(), Some("Widget"));
        assert!(parent.as_object().unwrap().properties.is_empty());
    }

    #[test]
    fn test_reference_cycle_without_object() {
        let schemas = components(DOC);
        let lowering = SchemaLowering::new(&schemas);
        let err = lowering.lower(&schemas["Loop"], "Loop").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedSchemaShape { .. }));
    }

    #[test]
    fn test_unsupported_shapes() {
        let schemas = components(DOC);
        let lowering = SchemaLowering::new(&schemas);
        assert!(matches!(
            lowering.lower(&schemas["Mixed"], "Mixed"),
            Err(AppError::UnsupportedSchemaShape { .. })
        ));
        assert!(matches!(
            lowering.lower(&schemas["Untyped"], "Untyped"),
            Err(AppError::UnsupportedSchemaShape { .. })
        ));
    }

    #[test]
    fn test_unknown_reference() {
        let schemas = components(DOC);
        let lowering = SchemaLowering::new(&schemas);
        let shim: ShimSchema =
            serde_yaml::from_str("$ref: '#/components/schemas/Nope'").unwrap();
        assert!(matches!(
            lowering.lower(&shim, "x"),
            Err(AppError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_same_shape_ignores_order_and_docs() {
        let a: ShimSchema = serde_yaml::from_str(
            "type: object\nrequired: [a, b]\nproperties:\n  a: {type: string}\n  b: {type: boolean}",
        )
        .unwrap();
        let b: ShimSchema = serde_yaml::from_str(
            "type: object\ndescription: other\nrequired: [b, a]\nproperties:\n  b: {type: boolean}\n  a: {type: string}",
        )
        .unwrap();
        let empty = IndexMap::new();
        let lowering = SchemaLowering::new(&empty);
        let a = lowering.lower(&a, "a").unwrap();
        let b = lowering.lower(&b, "b").unwrap();
        assert!(a.same_shape(&b));

        let c: ShimSchema =
            serde_yaml::from_str("type: object\nproperties:\n  a: {type: integer}").unwrap();
        assert!(!a.same_shape(&lowering.lower(&c, "c").unwrap()));
    }

    #[test]
    fn test_single_all_of_and_any_of() {
        let schemas = components(DOC);
        let lowering = SchemaLowering::new(&schemas);

        let wrapped: ShimSchema = serde_yaml::from_str(
            "allOf: [{$ref: '#/components/schemas/Widget'}]\ndescription: wrapped",
        )
        .unwrap();
        let lowered = lowering.lower(&wrapped, "w").unwrap();
        assert_eq!(lowered.reference.as_deref(), Some("Widget"));
        assert_eq!(lowered.description.as_deref(), Some("wrapped"));

        let any: ShimSchema =
            serde_yaml::from_str("anyOf: [{type: string}, {type: integer}]").unwrap();
        let lowered = lowering.lower(&any, "a").unwrap();
        assert!(matches!(lowered.kind, SchemaKind::OneOf(ref alts) if alts.len() == 2));
    }
}
