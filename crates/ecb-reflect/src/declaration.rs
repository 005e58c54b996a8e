//! User type declarations
//!
//! Project types are declared in configuration and turned into descriptors
//! at startup:
//!
//! ```toml
//! [[types]]
//! name = "Health"
//!
//! [[types.members]]
//! name = "current"
//! type = "float"
//! default = "100"
//! ```

use crate::coerce::{coerce, parse_value_type};
use crate::descriptor::{MemberDescriptor, MemberKind, TypeDescriptor};
use crate::error::ReflectError;
use crate::namespace::Namespace;
use serde::{Deserialize, Serialize};

/// One declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    #[serde(default)]
    pub namespace: Namespace,
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

/// One declared member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default = "default_true")]
    pub writable: bool,
    #[serde(default)]
    pub indexed: bool,
    /// Raw default, coerced like a `set` value
    #[serde(default)]
    pub default: Option<String>,
}

fn default_true() -> bool {
    true
}

impl TypeDeclaration {
    /// Build the descriptor, validating member types and defaults
    pub fn to_descriptor(&self) -> Result<TypeDescriptor, ReflectError> {
        let invalid = |reason: String| ReflectError::InvalidDeclaration {
            name: self.name.clone(),
            reason,
        };
        if self.name.is_empty() || self.name.contains(Namespace::SEPARATOR) {
            return Err(invalid("type name must be non-empty and unqualified".to_string()));
        }

        let mut descriptor = TypeDescriptor::new(self.namespace, self.name.clone());
        for m in &self.members {
            let value_type = parse_value_type(&m.value_type, &m.variants)
                .ok_or_else(|| invalid(format!("member '{}' has unknown type '{}'", m.name, m.value_type)))?;

            let mut member = match m.kind {
                MemberKind::Property => MemberDescriptor::property(m.name.clone(), value_type),
                MemberKind::Field => MemberDescriptor::field(m.name.clone(), value_type),
            };
            if let Some(raw) = &m.default {
                let value = coerce(raw, &member.value_type).ok_or_else(|| {
                    invalid(format!("default '{raw}' does not fit member '{}'", m.name))
                })?;
                member = member.with_default(value);
            }
            member.readable = m.readable;
            member.writable = m.writable;
            member.indexed = m.indexed;
            descriptor = descriptor.with_member(member);
        }
        Ok(descriptor)
    }
}
