#![deny(missing_docs)]

//! # Identifier Policy
//!
//! Turns arbitrary names from the document (schema names, property names,
//! parameter names, enum literals) into valid Rust identifiers.
//!
//! - Type names are `UpperCamelCase` (`getWidget` -> `GetWidget`).
//! - Members, fields and methods are `snake_case`; keywords get a trailing `_`.
//! - Enum members are `UpperCamelCase`; literals that change are renamed back
//!   on the wire with `#[serde(rename)]`.

use heck::{ToSnakeCase, ToUpperCamelCase};
use std::collections::HashSet;

/// Strict and reserved keywords that cannot be used as plain identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Type names the generated module relies on and must never redefine.
/// `T` is the client's transport parameter.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Box", "Default", "Err", "None", "Ok", "Option", "Result", "Self", "Some", "String", "T",
    "Vec",
];

/// Locals used inside generated method bodies.
const SHADOWED_LOCALS: &[&str] = &[
    "body", "observer", "retries", "path", "query", "uri", "request", "response",
];

fn strip_invalid(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

fn guard(ident: String, fallback: &str) -> String {
    if ident.is_empty() {
        return fallback.to_string();
    }
    let ident = if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", ident)
    } else {
        ident
    };
    if KEYWORDS.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Converts a name into an `UpperCamelCase` type name.
///
/// e.g. `getWidget` -> `GetWidget`, `fields[apps]` -> `FieldsApps`
pub fn title_case(name: &str) -> String {
    guard(strip_invalid(&name.to_upper_camel_case()), "Unnamed")
}

/// Converts a name into a `snake_case` member identifier.
///
/// e.g. `userId` -> `user_id`, `type` -> `type_`, `2fa` -> `_2fa`
pub fn valid_identifier(name: &str) -> String {
    guard(strip_invalid(&name.to_snake_case()), "field")
}

/// Converts an enum literal into an `UpperCamelCase` member name.
///
/// e.g. `RED` -> `Red`, `in-progress` -> `InProgress`, `""` -> `Empty`
pub fn valid_enum_member(literal: &str) -> String {
    guard(strip_invalid(&literal.to_upper_camel_case()), "Empty")
}

/// Member names for every literal of one enum, in declared order.
///
/// Literals that sanitize to the same member get a numeric suffix.
pub fn enum_members(literals: &[String]) -> Vec<String> {
    let mut used = HashSet::new();
    literals
        .iter()
        .map(|literal| {
            let base = valid_enum_member(literal);
            let mut member = base.clone();
            let mut counter = 2;
            while !used.insert(member.clone()) {
                member = format!("{}{}", base, counter);
                counter += 1;
            }
            member
        })
        .collect()
}

/// The `snake_case` method name for a title-cased operation name.
pub fn method_name(title: &str) -> String {
    valid_identifier(title)
}

/// Identifier for a method parameter; names that would shadow the
/// generated body's locals get a `_param` suffix.
pub fn parameter_identifier(name: &str) -> String {
    let ident = valid_identifier(name);
    if SHADOWED_LOCALS.contains(&ident.as_str()) {
        format!("{}_param", ident)
    } else {
        ident
    }
}

/// True if the generated module cannot define a type with this name.
pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// Escapes a value for use inside a Rust string literal.
pub fn string_literal(value: &str) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("getWidget"), "GetWidget");
        assert_eq!(title_case("fields[apps]"), "FieldsApps");
        assert_eq!(title_case("widget_color"), "WidgetColor");
        assert_eq!(title_case("v2"), "V2");
        assert_eq!(title_case("self"), "Self_");
    }

    #[test]
    fn test_valid_identifier() {
        assert_eq!(valid_identifier("userId"), "user_id");
        assert_eq!(valid_identifier("type"), "type_");
        assert_eq!(valid_identifier("self"), "self_");
        assert_eq!(valid_identifier("2fa"), "_2fa");
        assert_eq!(valid_identifier("filter[color]"), "filter_color");
        assert_eq!(valid_identifier("X-Trace-Id"), "x_trace_id");
        assert_eq!(valid_identifier("$$"), "field");
    }

    #[test]
    fn test_enum_members() {
        assert_eq!(valid_enum_member("RED"), "Red");
        assert_eq!(valid_enum_member("in-progress"), "InProgress");
        assert_eq!(valid_enum_member(""), "Empty");
        assert_eq!(valid_enum_member("1st"), "_1st");
        assert_eq!(valid_enum_member("Self"), "Self_");

        let literals = vec!["a-b".to_string(), "a_b".to_string(), "AB".to_string()];
        assert_eq!(enum_members(&literals), vec!["AB", "AB2", "Ab"]);
    }

    #[test]
    fn test_parameter_identifier() {
        assert_eq!(parameter_identifier("body"), "body_param");
        assert_eq!(parameter_identifier("Query"), "query_param");
        assert_eq!(parameter_identifier("limit"), "limit");
    }

    #[test]
    fn test_method_name() {
        assert_eq!(method_name("ListWidgetsV2"), "list_widgets_v2");
        assert_eq!(method_name("GetWidget"), "get_widget");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
    }
}
