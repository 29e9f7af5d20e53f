#![deny(missing_docs)]

//! # Registries
//!
//! Per-run bookkeeping for generated names:
//! - **NamedTypeRegistry**: composite and alias names, keyed by structural equality.
//! - **EnumRegistry**: enum names, keyed by their (unordered) value sets.
//! - **MethodNameRegistry**: method names, disambiguating repeated operation ids.
//!
//! Registries are populated in walk order and discarded after generation.

use crate::codegen::naming::{method_name, title_case};
use crate::error::{AppError, AppResult};
use crate::oas::document::HttpVerb;
use crate::oas::schema::Schema;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Outcome of registering a definition under a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First registration: the definition must be emitted.
    New,
    /// Same definition already registered: nothing to emit.
    Existing,
}

#[derive(Debug)]
struct NamedEntry {
    schema: Schema,
    emitted: bool,
}

/// Assigned type name -> schema.
#[derive(Debug, Default)]
pub struct NamedTypeRegistry {
    entries: HashMap<String, NamedEntry>,
}

impl NamedTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a name without emitting anything yet.
    pub fn reserve(&mut self, name: &str, schema: &Schema) -> AppResult<()> {
        if let Some(entry) = self.entries.get(name) {
            if !entry.schema.same_shape(schema) {
                return Err(conflict(name, "reserved twice for different schemas"));
            }
            return Ok(());
        }
        self.entries.insert(
            name.to_string(),
            NamedEntry {
                schema: schema.clone(),
                emitted: false,
            },
        );
        Ok(())
    }

    /// Registers a definition for emission.
    ///
    /// Re-registering the same schema is a no-op; a different schema under a
    /// used name is a `NamingConflict`.
    pub fn register(&mut self, name: &str, schema: &Schema) -> AppResult<Registration> {
        match self.entries.get_mut(name) {
            Some(entry) if !entry.schema.same_shape(schema) => Err(conflict(
                name,
                "already used by a structurally different schema",
            )),
            Some(entry) if entry.emitted => Ok(Registration::Existing),
            Some(entry) => {
                entry.emitted = true;
                Ok(Registration::New)
            }
            None => {
                self.entries.insert(
                    name.to_string(),
                    NamedEntry {
                        schema: schema.clone(),
                        emitted: true,
                    },
                );
                Ok(Registration::New)
            }
        }
    }

    /// True if `schema` could be registered under `name`.
    pub fn accepts(&self, name: &str, schema: &Schema) -> bool {
        self.entries
            .get(name)
            .is_none_or(|entry| entry.schema.same_shape(schema))
    }

    /// True if the name is held.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[derive(Debug)]
struct EnumEntry {
    values: BTreeSet<String>,
    emitted: bool,
}

/// Enum name -> value set.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    entries: HashMap<String, EnumEntry>,
}

impl EnumRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a name without emitting anything yet.
    pub fn reserve(&mut self, name: &str, values: &[String]) -> AppResult<()> {
        let set: BTreeSet<String> = values.iter().cloned().collect();
        match self.entries.get(name) {
            Some(entry) if entry.values != set => {
                Err(conflict(name, "reserved twice for different value sets"))
            }
            Some(_) => Ok(()),
            None => {
                self.entries.insert(
                    name.to_string(),
                    EnumEntry {
                        values: set,
                        emitted: false,
                    },
                );
                Ok(())
            }
        }
    }

    /// Registers an enum for emission. Value sets compare order-independently.
    pub fn register(&mut self, name: &str, values: &[String]) -> AppResult<Registration> {
        let set: BTreeSet<String> = values.iter().cloned().collect();
        match self.entries.get_mut(name) {
            Some(entry) if entry.values != set => Err(conflict(
                name,
                "already used by an enum with different values",
            )),
            Some(entry) if entry.emitted => Ok(Registration::Existing),
            Some(entry) => {
                entry.emitted = true;
                Ok(Registration::New)
            }
            None => {
                self.entries.insert(
                    name.to_string(),
                    EnumEntry {
                        values: set,
                        emitted: true,
                    },
                );
                Ok(Registration::New)
            }
        }
    }

    /// True if the name is held.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// A method name assigned to one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodName {
    /// Title-cased operation id (`ListWidgets`).
    pub base: String,
    /// Disambiguating suffix (`V2`), empty for the first occurrence.
    pub suffix: String,
}

impl MethodName {
    /// `base` + `suffix` (`ListWidgetsV2`).
    pub fn title(&self) -> String {
        format!("{}{}", self.base, self.suffix)
    }

    /// The Rust method identifier (`list_widgets_v2`).
    pub fn ident(&self) -> String {
        method_name(&self.title())
    }
}

/// Methods every generated client defines besides the operations.
const CLIENT_METHODS: [&str; 4] = ["new", "connect", "base_url", "next_page"];

/// Tracks `(verb, operationId)` pairs and the method names handed out.
#[derive(Debug)]
pub struct MethodNameRegistry {
    seen: HashSet<(HttpVerb, String)>,
    idents: HashSet<String>,
}

impl MethodNameRegistry {
    /// Creates a registry holding only the client's own method names.
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            idents: CLIENT_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Assigns a method name.
    ///
    /// A repeated `(verb, operation_id)` is suffixed with the title-cased
    /// second segment of `path` (`/v2/widgets` -> `V2`). A final name handed
    /// out twice is a `NamingConflict`.
    pub fn assign(
        &mut self,
        verb: HttpVerb,
        operation_id: &str,
        path: &str,
    ) -> AppResult<MethodName> {
        let base = title_case(operation_id);
        let suffix = if self.seen.insert((verb, operation_id.to_string())) {
            String::new()
        } else {
            let segment = path.split('/').nth(1).unwrap_or_default();
            let suffix = title_case(segment);
            tracing::debug!(
                "Repeated operation id '{}' ({}); suffixing '{}'",
                operation_id,
                verb,
                suffix
            );
            suffix
        };

        let name = MethodName { base, suffix };
        if !self.idents.insert(name.ident()) {
            return Err(conflict(
                &name.ident(),
                &format!("method name produced twice (at {} {})", verb, path),
            ));
        }
        Ok(name)
    }
}

impl Default for MethodNameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn conflict(name: &str, reason: &str) -> AppError {
    AppError::NamingConflict {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::schema::{ObjectShape, SchemaKind};
    use indexmap::IndexMap;

    fn object(fields: &[&str]) -> Schema {
        let mut properties = IndexMap::new();
        for field in fields {
            properties.insert(
                field.to_string(),
                Schema::new(SchemaKind::String { values: Vec::new() }),
            );
        }
        Schema::new(SchemaKind::Object(ObjectShape {
            properties,
            required: Vec::new(),
        }))
    }

    #[test]
    fn test_named_registration() {
        let mut registry = NamedTypeRegistry::new();
        registry.reserve("Widget", &object(&["id"])).unwrap();
        assert!(registry.accepts("Widget", &object(&["id"])));
        assert!(!registry.accepts("Widget", &object(&["name"])));

        assert_eq!(
            registry.register("Widget", &object(&["id"])).unwrap(),
            Registration::New
        );
        assert_eq!(
            registry.register("Widget", &object(&["id"])).unwrap(),
            Registration::Existing
        );
        let err = registry.register("Widget", &object(&["name"])).unwrap_err();
        assert!(matches!(err, AppError::NamingConflict { .. }));
    }

    #[test]
    fn test_enum_values_are_unordered() {
        let mut registry = EnumRegistry::new();
        let ab = vec!["A".to_string(), "B".to_string()];
        let ba = vec!["B".to_string(), "A".to_string()];
        let ac = vec!["A".to_string(), "C".to_string()];
        assert_eq!(registry.register("Letter", &ab).unwrap(), Registration::New);
        assert_eq!(
            registry.register("Letter", &ba).unwrap(),
            Registration::Existing
        );
        assert!(matches!(
            registry.register("Letter", &ac),
            Err(AppError::NamingConflict { .. })
        ));
    }

    #[test]
    fn test_method_names() {
        let mut registry = MethodNameRegistry::new();
        let first = registry.assign(HttpVerb::Get, "list", "/v1/apps").unwrap();
        let second = registry.assign(HttpVerb::Get, "list", "/v2/apps").unwrap();
        assert_eq!(first.ident(), "list");
        assert_eq!(second.ident(), "list_v2");
        assert_eq!(second.title(), "ListV2");

        // Same id under another verb is not a repeat, but the name is taken.
        let err = registry.assign(HttpVerb::Post, "list", "/v1/apps").unwrap_err();
        assert!(matches!(err, AppError::NamingConflict { .. }));

        let err = registry.assign(HttpVerb::Get, "nextPage", "/pages").unwrap_err();
        assert!(matches!(err, AppError::NamingConflict { .. }));
    }
}
