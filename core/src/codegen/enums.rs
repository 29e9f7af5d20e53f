#![deny(missing_docs)]

//! # Enumerated-Type Emitter
//!
//! One Rust enum per multi-literal string schema. Each enum carries an
//! explicit literal table (`ALL`, `as_str`, `Display`, `FromStr`) so values
//! convert between structurally identical enums without reflection.

use crate::codegen::naming::{enum_members, string_literal};
use crate::codegen::writer::CodeWriter;

const ENUM_DERIVES: &str = "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]";

/// One enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Rust member name.
    pub ident: String,
    /// Wire literal.
    pub literal: String,
}

/// A planned enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumPlan {
    /// Type name.
    pub name: String,
    /// Doc comment text.
    pub description: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
    /// Members in declared order.
    pub members: Vec<EnumMember>,
}

/// Plans an enum from its literals.
pub fn plan_enum(
    name: &str,
    literals: &[String],
    description: Option<String>,
    deprecated: bool,
) -> EnumPlan {
    let members = enum_members(literals)
        .into_iter()
        .zip(literals)
        .map(|(ident, literal)| EnumMember {
            ident,
            literal: literal.clone(),
        })
        .collect();
    EnumPlan {
        name: name.to_string(),
        description,
        deprecated,
        members,
    }
}

/// Renders the enum and its literal table.
pub fn render_enum(w: &mut CodeWriter, plan: &EnumPlan) {
    let name = &plan.name;

    if let Some(description) = &plan.description {
        w.doc(description);
    }
    if plan.deprecated {
        w.line("#[deprecated]");
    }
    w.line(ENUM_DERIVES);
    w.block(format!("pub enum {}", name), |w| {
        for (index, member) in plan.members.iter().enumerate() {
            if index == 0 {
                w.line("#[default]");
            }
            if member.ident != member.literal {
                w.line(format!(
                    "#[serde(rename = {})]",
                    string_literal(&member.literal)
                ));
            }
            w.line(format!("{},", member.ident));
        }
    });
    w.blank();

    let all: Vec<String> = plan
        .members
        .iter()
        .map(|m| format!("{}::{}", name, m.ident))
        .collect();
    w.block(format!("impl {}", name), |w| {
        w.line("/// Every member in declared order.");
        w.line(format!(
            "pub const ALL: [{}; {}] = [{}];",
            name,
            all.len(),
            all.join(", ")
        ));
        w.blank();
        w.line("/// The wire literal of this member.");
        w.block("pub fn as_str(&self) -> &'static str", |w| {
            w.block("match self", |w| {
                for member in &plan.members {
                    w.line(format!(
                        "{}::{} => {},",
                        name,
                        member.ident,
                        string_literal(&member.literal)
                    ));
                }
            });
        });
    });
    w.blank();

    w.block(format!("impl std::fmt::Display for {}", name), |w| {
        w.block(
            "fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result",
            |w| w.line("f.write_str(self.as_str())"),
        );
    });
    w.blank();

    w.block(format!("impl std::str::FromStr for {}", name), |w| {
        w.line("type Err = rt::UnknownEnumValue;");
        w.blank();
        w.block("fn from_str(value: &str) -> Result<Self, Self::Err>", |w| {
            w.block("match value", |w| {
                for member in &plan.members {
                    w.line(format!(
                        "{} => Ok({}::{}),",
                        string_literal(&member.literal),
                        name,
                        member.ident
                    ));
                }
                w.line(format!(
                    "_ => Err(rt::UnknownEnumValue::new({}, value)),",
                    string_literal(name)
                ));
            });
        });
    });
}
