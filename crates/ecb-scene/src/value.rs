//! Typed property values
//!
//! Every member of a component is declared with a [`ValueType`]; the live
//! bag holds [`PropertyValue`]s of that type.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-component vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Create new vector
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All components set to one
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create new color
    #[inline]
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Declared type of a component member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "variants")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    Vector3,
    Color,
    /// Closed set of named variants
    Enum(Vec<String>),
    /// Reference to a live node
    ObjectRef,
    /// Reference to an asset by path
    AssetRef,
}

impl ValueType {
    /// Whether the member refers to a live object
    #[inline]
    #[must_use]
    pub fn is_object_ref(&self) -> bool {
        matches!(self, ValueType::ObjectRef)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => f.write_str("bool"),
            ValueType::Int => f.write_str("int"),
            ValueType::Float => f.write_str("float"),
            ValueType::String => f.write_str("string"),
            ValueType::Vector3 => f.write_str("vector3"),
            ValueType::Color => f.write_str("color"),
            ValueType::Enum(variants) => write!(f, "enum({})", variants.join("|")),
            ValueType::ObjectRef => f.write_str("objectRef"),
            ValueType::AssetRef => f.write_str("assetRef"),
        }
    }
}

/// A live property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vector3(Vec3),
    Color(Color),
    Enum(String),
    ObjectRef(Option<NodeId>),
    AssetRef(Option<String>),
}

impl PropertyValue {
    /// Zero value for a declared type
    #[must_use]
    pub fn default_for(value_type: &ValueType) -> Self {
        match value_type {
            ValueType::Bool => PropertyValue::Bool(false),
            ValueType::Int => PropertyValue::Int(0),
            ValueType::Float => PropertyValue::Float(0.0),
            ValueType::String => PropertyValue::String(String::new()),
            ValueType::Vector3 => PropertyValue::Vector3(Vec3::default()),
            ValueType::Color => PropertyValue::Color(Color::default()),
            ValueType::Enum(variants) => {
                PropertyValue::Enum(variants.first().cloned().unwrap_or_default())
            }
            ValueType::ObjectRef => PropertyValue::ObjectRef(None),
            ValueType::AssetRef => PropertyValue::AssetRef(None),
        }
    }

    /// Whether this value can be stored in a member of `value_type`
    #[must_use]
    pub fn matches(&self, value_type: &ValueType) -> bool {
        match (self, value_type) {
            (PropertyValue::Bool(_), ValueType::Bool)
            | (PropertyValue::Int(_), ValueType::Int)
            | (PropertyValue::Float(_), ValueType::Float)
            | (PropertyValue::String(_), ValueType::String)
            | (PropertyValue::Vector3(_), ValueType::Vector3)
            | (PropertyValue::Color(_), ValueType::Color)
            | (PropertyValue::ObjectRef(_), ValueType::ObjectRef)
            | (PropertyValue::AssetRef(_), ValueType::AssetRef) => true,
            (PropertyValue::Enum(v), ValueType::Enum(variants)) => variants.contains(v),
            _ => false,
        }
    }

    /// Short name of the value's type, for diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::Vector3(_) => "vector3",
            PropertyValue::Color(_) => "color",
            PropertyValue::Enum(_) => "enum",
            PropertyValue::ObjectRef(_) => "objectRef",
            PropertyValue::AssetRef(_) => "assetRef",
        }
    }

    /// Get as bool
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as object reference (outer `None` if not a reference)
    #[inline]
    #[must_use]
    pub fn as_object_ref(&self) -> Option<Option<NodeId>> {
        match self {
            PropertyValue::ObjectRef(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::String(v) | PropertyValue::Enum(v) => f.write_str(v),
            PropertyValue::Vector3(v) => write!(f, "{v}"),
            PropertyValue::Color(v) => write!(f, "{v}"),
            PropertyValue::ObjectRef(Some(id)) => write!(f, "{id}"),
            PropertyValue::AssetRef(Some(path)) => f.write_str(path),
            PropertyValue::ObjectRef(None) | PropertyValue::AssetRef(None) => f.write_str("null"),
        }
    }
}
