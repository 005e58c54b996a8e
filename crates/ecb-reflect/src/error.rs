//! Error types for type resolution and property access

/// Reflection errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReflectError {
    /// No registered type matches the name
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// No member of that name (or no writable one, for writes)
    #[error("property '{property}' not found on {type_name}")]
    PropertyNotFound { type_name: String, property: String },

    /// The member exists but its current value cannot be read
    #[error("property '{property}' on {type_name} is unreadable")]
    Unreadable { type_name: String, property: String },

    /// Raw or typed value does not fit the member's declared type
    #[error("cannot assign '{value}' to '{property}': expected {expected}")]
    TypeMismatch {
        property: String,
        expected: String,
        value: String,
    },

    /// The qualified name is already registered
    #[error("type already registered: {0}")]
    DuplicateType(String),

    /// A configured type declaration is malformed
    #[error("invalid declaration for '{name}': {reason}")]
    InvalidDeclaration { name: String, reason: String },
}

impl ReflectError {
    #[inline]
    pub(crate) fn property_not_found(type_name: &str, property: &str) -> Self {
        Self::PropertyNotFound {
            type_name: type_name.to_string(),
            property: property.to_string(),
        }
    }
}
