//! ECB Scene Model
//!
//! The live object graph the bridge operates on.
//!
//! # Core Concepts
//!
//! - [`SceneGraph`]: generational arena of [`SceneNode`]s plus the registered root set
//! - [`NodePath`]: `/`-separated name path from a root to a node
//! - [`ComponentSlot`]: an attached [`ComponentInstance`] or a slot that lost its value
//! - [`PropertyValue`]: typed value held in a component's property bag
//! - [`Traversal`]: depth-first walk with a maximum-depth guard
//!
//! # Example
//!
//! ```rust,ignore
//! use ecb_scene::{SceneGraph, Traversal};
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.add_root("root");
//! graph.add_child(root, "childA")?;
//!
//! let stats = Traversal::new(64).walk(&graph, &mut |_: ecb_scene::Visit<'_>| {})?;
//! assert_eq!(stats.visited, 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod component;
mod document;
mod error;
mod graph;
mod hierarchy;
mod id;
mod node;
mod path;
mod traversal;
mod value;

pub use component::{ComponentInstance, ComponentSlot};
pub use document::{ComponentDocument, DocValue, NodeDocument, SceneDocument};
pub use error::SceneError;
pub use graph::SceneGraph;
pub use hierarchy::{snapshot, HierarchyEntry};
pub use id::NodeId;
pub use node::SceneNode;
pub use path::NodePath;
pub use traversal::{Traversal, TraversalStats, Visit, Visitor};
pub use value::{Color, PropertyValue, ValueType, Vec3};

/// Default maximum traversal depth
pub const DEFAULT_MAX_DEPTH: usize = 256;
