#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Helper functions to resolve local `$ref` pointers.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;

/// Extracts the simple name from a reference string.
/// e.g. `#/components/schemas/User` -> `User`
pub fn extract_ref_name(ref_loc: &str) -> String {
    ref_loc
        .split('/')
        .next_back()
        .unwrap_or("Unknown")
        .to_string()
}

/// Resolves a `#/components/<section>/<name>` pointer against one component map.
///
/// Only local pointers into the expected section are accepted.
pub fn resolve_component<'a, T>(
    reference: &str,
    section: &str,
    items: &'a IndexMap<String, T>,
) -> AppResult<(String, &'a T)> {
    let prefix = format!("#/components/{}/", section);
    let unresolved = || AppError::UnresolvedReference {
        reference: reference.to_string(),
    };

    if !reference.starts_with(&prefix) {
        return Err(unresolved());
    }
    let name = extract_ref_name(reference);
    items
        .get(&name)
        .map(|item| (name, item))
        .ok_or_else(unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ref_name() {
        assert_eq!(extract_ref_name("#/components/schemas/User"), "User");
        assert_eq!(extract_ref_name("User"), "User");
    }

    #[test]
    fn test_resolve_component() {
        let mut items = IndexMap::new();
        items.insert("Limit".to_string(), 10);

        let (name, value) =
            resolve_component("#/components/parameters/Limit", "parameters", &items).unwrap();
        assert_eq!(name, "Limit");
        assert_eq!(*value, 10);

        let err = resolve_component("#/components/schemas/Limit", "parameters", &items);
        assert!(matches!(err, Err(AppError::UnresolvedReference { .. })));

        let err = resolve_component("#/components/parameters/Missing", "parameters", &items);
        assert!(matches!(err, Err(AppError::UnresolvedReference { .. })));
    }
}
