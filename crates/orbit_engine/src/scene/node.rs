//! Transform nodes
//!
//! A node is pure data: its local placement, links into the arena and an optional
//! opaque attachment naming whatever the renderer should draw there.

use crate::foundation::collections::NodeId;
use crate::foundation::math::Transform;

/// Opaque handle to a collaborator-owned resource (geometry, material, light, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u64);

/// What a node carries for the renderer
///
/// The kernel never looks inside these; it only hands them back alongside world
/// transforms during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Geometry drawn with a material
    Mesh {
        /// Geometry handle
        geometry: AssetHandle,
        /// Material handle
        material: AssetHandle,
    },
    /// A light source
    Light(AssetHandle),
    /// A debug helper (axes, grid, light gizmo)
    Helper(AssetHandle),
    /// A camera rig
    Camera(AssetHandle),
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct TransformNode {
    /// Human readable name, not required to be unique
    pub name: String,

    /// Placement relative to the parent
    pub local: Transform,

    /// Hidden nodes hide their whole subtree from rendering
    pub visible: bool,

    /// Draw-order hint for the renderer; lower draws first
    pub render_order: i32,

    /// Collaborator resource drawn at this node
    pub attachment: Option<Attachment>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl TransformNode {
    /// Create a detached node
    pub fn new(name: impl Into<String>, local: Transform) -> Self {
        Self {
            name: name.into(),
            local,
            visible: true,
            render_order: 0,
            attachment: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder pattern: Set attachment
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Builder pattern: Set render order
    pub fn with_render_order(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    /// Builder pattern: Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Parent link, if attached under another node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
