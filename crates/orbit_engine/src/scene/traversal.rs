//! Depth-first traversal
//!
//! Pre-order, children in insertion order. Renderers rely on this order for
//! deterministic draw order, so it must not change.

use crate::foundation::collections::NodeId;
use crate::foundation::math::Mat4;

use super::scene_graph::SceneGraph;

/// One step of a traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// Visited node
    pub id: NodeId,
    /// World transform of the node
    pub world: Mat4,
    /// Distance from the root (roots are depth 0)
    pub depth: usize,
    /// False when the node or any ancestor is hidden
    pub visible: bool,
}

#[derive(Debug)]
struct Pending {
    id: NodeId,
    parent_world: Mat4,
    depth: usize,
    parent_visible: bool,
}

/// Lazy pre-order iterator produced by [`SceneGraph::traverse`]
///
/// World transforms are composed incrementally as the walk descends, so a full
/// traversal costs one matrix product per node.
#[derive(Debug)]
pub struct Traversal<'a> {
    graph: &'a SceneGraph,
    stack: Vec<Pending>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(
        graph: &'a SceneGraph,
        start: NodeId,
        parent_world: Mat4,
        depth: usize,
        parent_visible: bool,
    ) -> Self {
        Self {
            graph,
            stack: vec![Pending {
                id: start,
                parent_world,
                depth,
                parent_visible,
            }],
        }
    }

    pub(crate) fn empty(graph: &'a SceneGraph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        loop {
            let pending = self.stack.pop()?;
            // Nodes cannot disappear while the graph is borrowed, but stay total anyway
            let Ok(node) = self.graph.node(pending.id) else {
                continue;
            };

            let world = pending.parent_world * node.local.to_matrix();
            let visible = pending.parent_visible && node.visible;

            // Reverse push so the first child pops first
            self.stack.extend(node.children().iter().rev().map(|&child| Pending {
                id: child,
                parent_world: world,
                depth: pending.depth + 1,
                parent_visible: visible,
            }));

            return Some(Visit {
                id: pending.id,
                world,
                depth: pending.depth,
                visible,
            });
        }
    }
}
