//! Scene container shared by animations and bindings

use super::scene_graph::SceneGraph;

/// The object store animations and bindings mutate
///
/// `content` holds whatever host objects live beside the graph (light
/// parameters, helper state, ...). Binding rules receive the whole scene so a
/// single property can touch both.
#[derive(Debug, Default)]
pub struct Scene<C> {
    /// Transform hierarchy
    pub graph: SceneGraph,
    /// Host-defined objects
    pub content: C,
}

impl<C> Scene<C> {
    /// Create a scene with an empty graph
    pub fn new(content: C) -> Self {
        Self {
            graph: SceneGraph::new(),
            content,
        }
    }
}
