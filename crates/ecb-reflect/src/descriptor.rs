//! Type and member descriptors

use crate::namespace::Namespace;
use ecb_scene::{ComponentInstance, PropertyValue, ValueType};
use serde::{Deserialize, Serialize};

/// How a member is exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Accessor-backed member; may be read-only
    #[default]
    Property,
    /// Plain data member
    Field,
}

/// One member of a described type
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub name: String,
    pub kind: MemberKind,
    pub value_type: ValueType,
    pub readable: bool,
    pub writable: bool,
    /// Indexer-style member, never enumerated by `read_all`
    pub indexed: bool,
    pub default: PropertyValue,
}

impl MemberDescriptor {
    /// Readable and writable property with the type's zero default
    #[must_use]
    pub fn property(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, MemberKind::Property, value_type)
    }

    /// Readable and writable field with the type's zero default
    #[must_use]
    pub fn field(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, MemberKind::Field, value_type)
    }

    fn new(name: impl Into<String>, kind: MemberKind, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            kind,
            default: PropertyValue::default_for(&value_type),
            value_type,
            readable: true,
            writable: true,
            indexed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: PropertyValue) -> Self {
        self.default = default;
        self
    }

    #[inline]
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Whether `set` may target this member
    #[inline]
    #[must_use]
    pub fn is_settable(&self) -> bool {
        self.writable && !self.indexed
    }
}

/// Builds a fresh instance of a described type
pub type Constructor = fn(&TypeDescriptor) -> ComponentInstance;

/// Default constructor: every member at its default, in declaration order
#[must_use]
pub fn default_instance(descriptor: &TypeDescriptor) -> ComponentInstance {
    descriptor
        .members
        .iter()
        .fold(
            ComponentInstance::new(descriptor.name.clone()).with_namespace(descriptor.namespace.as_str()),
            |instance, m| instance.with_value(m.name.clone(), m.default.clone()),
        )
}

/// Registry entry for one component type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub namespace: Namespace,
    pub name: String,
    pub members: Vec<MemberDescriptor>,
    pub constructor: Constructor,
}

impl TypeDescriptor {
    /// Create new descriptor with the default constructor
    #[must_use]
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
            members: Vec::new(),
            constructor: default_instance,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Same namespace and name
    #[inline]
    #[must_use]
    pub fn is_same_type(&self, other: &TypeDescriptor) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }

    /// `namespace::Name`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.namespace, Namespace::SEPARATOR, self.name)
    }

    /// Any member of the given name, properties first
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.member_of_kind(name, MemberKind::Property)
            .or_else(|| self.member_of_kind(name, MemberKind::Field))
    }

    fn member_of_kind(&self, name: &str, kind: MemberKind) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.kind == kind && m.name == name)
    }

    /// Object-reference members that can be read
    pub fn reference_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members
            .iter()
            .filter(|m| m.value_type.is_object_ref() && m.readable && !m.indexed)
    }

    /// Construct a fresh instance
    #[must_use]
    pub fn construct(&self) -> ComponentInstance {
        (self.constructor)(self)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name && self.members == other.members
    }
}
