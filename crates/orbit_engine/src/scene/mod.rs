//! Scene graph
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena of TransformNode, ordered roots)
//!      ↓ traverse()
//! Visit { id, world, depth, visible }
//!      ↓
//! Renderer collaborator
//! ```
//!
//! Nodes are addressed by [`NodeId`](crate::foundation::collections::NodeId).
//! Parent/child relationships are index links, which keeps cycle detection a
//! simple walk up the parent chain and makes detach/reattach free of lifetime
//! concerns.

mod content;
mod node;
mod scene_graph;
mod traversal;

pub use content::Scene;
pub use node::{AssetHandle, Attachment, TransformNode};
pub use scene_graph::{Ancestors, SceneGraph};
pub use traversal::{Traversal, Visit};
