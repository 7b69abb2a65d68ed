//! Hierarchical scene graph
//!
//! Nodes live in a slot-map arena and refer to each other by [`NodeId`]. Children
//! are owned through the arena, parents are plain back links used for world
//! transform composition and cycle checks. The graph keeps an ordered list of
//! roots; a node that is neither a root nor under one is an orphan and is left out
//! of traversal until it is re-attached.

use crate::core::error::SceneError;
use crate::foundation::collections::{NodeId, SlotMap};
use crate::foundation::math::{Mat4, Transform};

use super::node::TransformNode;
use super::traversal::Traversal;

/// Arena-backed transform hierarchy
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, TransformNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes, orphans included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Whether `id` is a registered root
    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Result<&TransformNode, SceneError> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut TransformNode, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Local transform of a node
    pub fn local(&self, id: NodeId) -> Result<&Transform, SceneError> {
        Ok(&self.node(id)?.local)
    }

    /// Mutable local transform of a node
    pub fn local_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneError> {
        Ok(&mut self.node_mut(id)?.local)
    }

    /// Show or hide a node and its subtree
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// First node with the given name, in arena order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Insert a node as a detached orphan
    ///
    /// Links carried by the node (for instance from cloning a live node) are
    /// dropped; only its data is kept.
    pub fn insert(&mut self, mut node: TransformNode) -> NodeId {
        if node.parent.take().is_some() || !node.children.is_empty() {
            log::debug!("Dropping hierarchy links of inserted node '{}'", node.name);
            node.children.clear();
        }
        let id = self.nodes.insert(node);
        log::trace!("Created node {:?}", id);
        id
    }

    /// Create a detached node; it is an orphan until rooted or attached
    pub fn create_node(&mut self, name: impl Into<String>, local: Transform) -> NodeId {
        self.insert(TransformNode::new(name, local))
    }

    /// Create a node and register it as a root
    pub fn spawn_root(&mut self, name: impl Into<String>, local: Transform) -> NodeId {
        let id = self.create_node(name, local);
        self.roots.push(id);
        id
    }

    /// Create a node as the last child of `parent`
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeId, SceneError> {
        self.node(parent)?;
        let id = self.create_node(name, local);
        self.link(parent, id);
        Ok(id)
    }

    /// Register a node as a root, detaching it from any parent first
    pub fn add_root(&mut self, id: NodeId) -> Result<(), SceneError> {
        if self.is_root(id) {
            return Ok(());
        }
        self.detach(id)?;
        self.roots.push(id);
        Ok(())
    }

    /// Drop a node from the root list; returns whether it was a root
    ///
    /// The node and its subtree stay in the arena as orphans.
    pub fn remove_root(&mut self, id: NodeId) -> bool {
        let was_root = self.is_root(id);
        if was_root {
            self.roots.retain(|&r| r != id);
        }
        was_root
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// Fails with [`SceneError::Cycle`] when `parent` is `child` or one of its
    /// descendants; the graph is left untouched in that case. Otherwise `child` is
    /// detached from its current parent (or the root list) first.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        self.node(child)?;

        if parent == child || self.is_ancestor(child, parent) {
            log::debug!("Rejected attach of {:?} under {:?}: cycle", child, parent);
            return Err(SceneError::Cycle { parent, child });
        }

        self.detach(child)?;
        self.link(parent, child);
        Ok(())
    }

    /// Detach a node from its parent or from the root list
    ///
    /// The node keeps its subtree but becomes an orphan: it is skipped by traversal
    /// until re-attached or re-rooted.
    pub fn detach(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.node_mut(id)?.parent.take();
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
        Ok(())
    }

    /// Remove a node and its whole subtree, returning every removed id
    pub fn destroy(&mut self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        self.detach(id)?;

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(current) {
                pending.extend(node.children);
                removed.push(current);
            }
        }

        log::debug!("Destroyed {} node(s) rooted at {:?}", removed.len(), id);
        Ok(removed)
    }

    /// Iterate the parent chain of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.nodes.get(id).and_then(|node| node.parent),
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Topmost ancestor of a node (the node itself when it has no parent)
    pub fn top_of(&self, id: NodeId) -> Result<NodeId, SceneError> {
        self.node(id)?;
        Ok(self.ancestors(id).last().unwrap_or(id))
    }

    /// Whether the node is reachable from a registered root
    pub fn is_reachable(&self, id: NodeId) -> bool {
        self.top_of(id).map(|top| self.is_root(top)).unwrap_or(false)
    }

    /// World transform of a node, composed root to leaf
    ///
    /// Computed on demand; for a root this is its local matrix. Orphans report
    /// [`SceneError::Orphan`].
    pub fn world_transform(&self, id: NodeId) -> Result<Mat4, SceneError> {
        if !self.is_reachable(id) {
            self.node(id)?;
            return Err(SceneError::Orphan(id));
        }
        Ok(self.chain_matrix(id))
    }

    /// Lazy pre-order traversal starting at `start`
    ///
    /// `start` is normally a root, but any reachable node works; its parent chain
    /// seeds the world transform. Unknown or orphaned starting points yield an
    /// empty traversal.
    pub fn traverse(&self, start: NodeId) -> Traversal<'_> {
        if !self.is_reachable(start) {
            log::debug!("Skipping traversal from unreachable node {:?}", start);
            return Traversal::empty(self);
        }

        let parent = self.nodes[start].parent;
        let parent_world = parent.map_or_else(Mat4::identity, |p| self.chain_matrix(p));
        let parent_visible = parent.map_or(true, |p| self.effective_visible(p));
        let depth = self.ancestors(start).count();
        Traversal::new(self, start, parent_world, depth, parent_visible)
    }

    /// Traverse every root in root order
    pub fn traverse_all(&self) -> impl Iterator<Item = super::traversal::Visit> + '_ {
        self.roots.iter().flat_map(move |&root| self.traverse(root))
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn chain_matrix(&self, id: NodeId) -> Mat4 {
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);
        chain
            .into_iter()
            .fold(Mat4::identity(), |world, n| world * self.nodes[n].local.to_matrix())
    }

    fn effective_visible(&self, id: NodeId) -> bool {
        self.nodes.get(id).map_or(false, |node| node.visible)
            && self
                .ancestors(id)
                .all(|a| self.nodes.get(a).map_or(false, |node| node.visible))
    }
}

/// Iterator over a node's parent chain
#[derive(Debug)]
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.nodes.get(current).and_then(|node| node.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{translation_of, Vec3};
    use approx::assert_relative_eq;

    fn at(x: f32) -> Transform {
        Transform::from_position(Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_world_of_root_is_local() {
        let mut graph = SceneGraph::new();
        let local = at(3.0).with_rotation_euler(0.1, 0.2, 0.3).with_uniform_scale(2.0);
        let root = graph.spawn_root("root", local.clone());

        assert_relative_eq!(graph.world_transform(root).unwrap(), local.to_matrix());
    }

    #[test]
    fn test_depth_two_translation_composes() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_root("root", Transform::identity());
        let parent = graph.spawn_child(root, "parent", at(10.0)).unwrap();
        let child = graph.spawn_child(parent, "child", at(2.0)).unwrap();

        let world = graph.world_transform(child).unwrap();
        assert_relative_eq!(translation_of(&world), Vec3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_parent_rotation_carries_children() {
        let mut graph = SceneGraph::new();
        let sun = graph.spawn_root(
            "sun",
            Transform::identity().with_rotation_axis_angle(Vec3::y(), std::f32::consts::FRAC_PI_2),
        );
        let earth = graph.spawn_child(sun, "earth", at(10.0)).unwrap();

        let world = graph.world_transform(earth).unwrap();
        assert_relative_eq!(translation_of(&world), Vec3::new(0.0, 0.0, -10.0), epsilon = 1e-5);
    }

    #[test]
    fn test_attach_self_is_cycle() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn_root("a", Transform::identity());

        assert_eq!(graph.attach(a, a), Err(SceneError::Cycle { parent: a, child: a }));
        assert!(graph.is_root(a));
    }

    #[test]
    fn test_attach_ancestor_under_descendant_is_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn_root("a", Transform::identity());
        let b = graph.spawn_child(a, "b", Transform::identity()).unwrap();
        let c = graph.spawn_child(b, "c", Transform::identity()).unwrap();

        assert!(matches!(graph.attach(c, a), Err(SceneError::Cycle { .. })));
        assert!(matches!(graph.attach(b, a), Err(SceneError::Cycle { .. })));

        // Unchanged
        assert_eq!(graph.roots(), &[a]);
        assert_eq!(graph.node(a).unwrap().children(), &[b]);
        assert_eq!(graph.node(b).unwrap().children(), &[c]);
        assert_eq!(graph.node(a).unwrap().parent(), None);
    }

    #[test]
    fn test_random_attach_sequences_stay_acyclic() {
        let mut graph = SceneGraph::new();
        let nodes: Vec<NodeId> = (0..8)
            .map(|i| graph.spawn_root(format!("n{i}"), Transform::identity()))
            .collect();

        // Deterministic pseudo-random pairs
        let mut seed: u32 = 0x2545_F491;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let parent = nodes[(seed % 8) as usize];
            let child = nodes[((seed >> 8) % 8) as usize];

            let creates_cycle = parent == child || graph.is_ancestor(child, parent);
            let result = graph.attach(parent, child);
            assert_eq!(result.is_err(), creates_cycle);

            for &n in &nodes {
                assert!(!graph.is_ancestor(n, n), "node became its own ancestor");
                assert!(graph.ancestors(n).count() < nodes.len());
            }
        }
    }

    #[test]
    fn test_attach_moves_between_parents() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn_root("a", Transform::identity());
        let b = graph.spawn_root("b", Transform::identity());
        let c = graph.spawn_child(a, "c", Transform::identity()).unwrap();

        graph.attach(b, c).unwrap();
        assert!(graph.node(a).unwrap().children().is_empty());
        assert_eq!(graph.node(b).unwrap().children(), &[c]);
        assert_eq!(graph.node(c).unwrap().parent(), Some(b));

        // A root attached elsewhere stops being a root
        graph.attach(a, b).unwrap();
        assert_eq!(graph.roots(), &[a]);
    }

    #[test]
    fn test_detached_node_is_orphan() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_root("root", Transform::identity());
        let child = graph.spawn_child(root, "child", at(1.0)).unwrap();
        let grandchild = graph.spawn_child(child, "grandchild", at(1.0)).unwrap();

        graph.detach(child).unwrap();
        assert!(!graph.is_reachable(child));
        assert!(!graph.is_reachable(grandchild));
        assert_eq!(graph.world_transform(grandchild), Err(SceneError::Orphan(grandchild)));
        assert_eq!(graph.traverse(child).count(), 0);
        assert_eq!(graph.traverse_all().count(), 1);

        graph.add_root(child).unwrap();
        assert_relative_eq!(
            translation_of(&graph.world_transform(grandchild).unwrap()),
            Vec3::new(2.0, 0.0, 0.0)
        );

        assert!(graph.remove_root(child));
        assert!(!graph.remove_root(child));
        assert_eq!(graph.world_transform(grandchild), Err(SceneError::Orphan(grandchild)));
        assert!(graph.contains(grandchild));
    }

    #[test]
    fn test_insert_drops_links_of_cloned_node() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_root("root", Transform::identity());
        let a = graph.spawn_child(root, "a", at(1.0)).unwrap();
        let b = graph.spawn_child(a, "b", at(1.0)).unwrap();

        let linked = graph.node(a).unwrap().clone();
        let copy = graph.insert(linked);
        assert!(graph.node(copy).unwrap().parent().is_none());
        assert!(graph.node(copy).unwrap().children().is_empty());
        assert!(!graph.is_reachable(copy));

        graph.add_root(copy).unwrap();
        let visits: Vec<NodeId> = graph.traverse_all().map(|visit| visit.id).collect();
        assert_eq!(visits, vec![root, a, b, copy]);

        graph.destroy(copy).unwrap();
        assert_eq!(graph.node(a).unwrap().children(), &[b]);
        assert!(graph.contains(b));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_root("root", Transform::identity());
        let a = graph.spawn_child(root, "a", Transform::identity()).unwrap();
        let b = graph.spawn_child(a, "b", Transform::identity()).unwrap();
        let keep = graph.spawn_child(root, "keep", Transform::identity()).unwrap();

        let mut removed = graph.destroy(a).unwrap();
        removed.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(removed, expected);

        assert!(!graph.contains(b));
        assert_eq!(graph.node(root).unwrap().children(), &[keep]);
        assert_eq!(graph.world_transform(b), Err(SceneError::UnknownNode(b)));
    }

    #[test]
    fn test_unknown_node_errors() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_root("root", Transform::identity());
        let gone = graph.spawn_root("gone", Transform::identity());
        graph.destroy(gone).unwrap();

        assert_eq!(graph.attach(root, gone), Err(SceneError::UnknownNode(gone)));
        assert_eq!(graph.detach(gone), Err(SceneError::UnknownNode(gone)));
        assert_eq!(graph.find_by_name("root"), Some(root));
    }
}
