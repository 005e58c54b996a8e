//! ECB Reflection
//!
//! Name-based access to typed objects without runtime reflection: every
//! component type the bridge can touch is described up front in a
//! [`TypeRegistry`], and the accessor works purely from those descriptors.
//!
//! # Core Concepts
//!
//! - [`Namespace`]: `engine`, `extensions`, `user`, searched in that order
//! - [`TypeDescriptor`]: members plus a constructor for one component type
//! - [`TypeRegistry`]: short or qualified name → descriptor
//! - [`Reflect`] / [`ReflectMut`]: the seam the accessor operates on
//! - [`accessor`]: `get`, `set`, `set_value`, `read_all`
//!
//! # Example
//!
//! ```rust,ignore
//! use ecb_reflect::{accessor, Reflected, TypeRegistry};
//!
//! let registry = TypeRegistry::with_builtins();
//! let camera = registry.resolve("Camera")?;
//! let mut instance = camera.construct();
//!
//! accessor::set(&mut Reflected::new(camera, &mut instance), "fieldOfView", "75")?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod accessor;
mod builtin;
mod coerce;
mod declaration;
mod descriptor;
mod error;
mod namespace;
mod reflect;
mod registry;

pub use accessor::UNREADABLE;
pub use coerce::{coerce, parse_value_type};
pub use declaration::{MemberDeclaration, TypeDeclaration};
pub use descriptor::{Constructor, MemberDescriptor, MemberKind, TypeDescriptor};
pub use error::ReflectError;
pub use namespace::Namespace;
pub use reflect::{node_members, Reflect, ReflectMut, Reflected};
pub use registry::TypeRegistry;

/// Pseudo type name addressing a node's own members
pub const NODE_TYPE: &str = "Node";
