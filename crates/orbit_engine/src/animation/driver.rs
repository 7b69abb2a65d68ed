//! Animation driver
//!
//! Holds the animation bindings registered at scene setup and applies them once
//! per tick, in registration order. The driver mutates state in place and never
//! renders; the host renders after each tick.

use crate::binding::{BindingRegistry, OwnerKey, PropertyValue};
use crate::core::error::BindingError;
use crate::foundation::collections::{AnimationId, NodeId, SlotMap};
use crate::scene::Scene;

use super::rules::{NodeRule, PropertyRule};

/// Run state of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// No ticks are applied
    #[default]
    Stopped,
    /// Ticks are applied until stopped
    Running,
}

/// What an animation binding mutates
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationTarget<O> {
    /// Local transform of a node
    Node(NodeId),
    /// A bound property, written through the binding registry
    Property {
        /// Owner key
        owner: O,
        /// Property name
        name: String,
    },
}

enum AnimationBinding<O> {
    Node {
        node: NodeId,
        rule: NodeRule,
    },
    Property {
        owner: O,
        name: String,
        rule: PropertyRule,
    },
}

impl<O: OwnerKey> AnimationBinding<O> {
    fn target(&self) -> AnimationTarget<O> {
        match self {
            Self::Node { node, .. } => AnimationTarget::Node(*node),
            Self::Property { owner, name, .. } => AnimationTarget::Property {
                owner: *owner,
                name: name.clone(),
            },
        }
    }
}

/// Outcome of one tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Bindings applied
    pub applied: usize,
    /// Bindings dropped because their node, owner or property is gone
    pub pruned: usize,
    /// Property writes rejected by the registry
    pub failures: Vec<(AnimationId, BindingError)>,
}

/// Applies time-driven updates to nodes and bound properties
pub struct AnimationDriver<O> {
    bindings: SlotMap<AnimationId, AnimationBinding<O>>,
    order: Vec<AnimationId>,
    state: DriverState,
}

impl<O: std::fmt::Debug> std::fmt::Debug for AnimationDriver<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("state", &self.state)
            .field("bindings", &self.order.len())
            .finish()
    }
}

impl<O: OwnerKey> Default for AnimationDriver<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: OwnerKey> AnimationDriver<O> {
    /// Create a stopped driver with no bindings
    pub fn new() -> Self {
        Self {
            bindings: SlotMap::with_key(),
            order: Vec::new(),
            state: DriverState::Stopped,
        }
    }

    /// Current run state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Whether ticks are being applied
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// `Stopped → Running`
    pub fn start(&mut self) {
        if self.state == DriverState::Stopped {
            log::info!("Animation driver started with {} binding(s)", self.order.len());
        }
        self.state = DriverState::Running;
    }

    /// `Running → Stopped`; the host stops requesting frames
    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            log::info!("Animation driver stopped");
        }
        self.state = DriverState::Stopped;
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no bindings are registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Target of a binding
    pub fn target(&self, id: AnimationId) -> Option<AnimationTarget<O>> {
        self.bindings.get(id).map(AnimationBinding::target)
    }

    /// Animate a node's local transform
    pub fn add_node(&mut self, node: NodeId, rule: NodeRule) -> AnimationId {
        self.insert(AnimationBinding::Node { node, rule })
    }

    /// Animate a bound property
    pub fn add_property(
        &mut self,
        owner: O,
        name: impl Into<String>,
        rule: impl Fn(f32) -> PropertyValue + Send + 'static,
    ) -> AnimationId {
        self.insert(AnimationBinding::Property {
            owner,
            name: name.into(),
            rule: Box::new(rule),
        })
    }

    /// Remove a binding; returns whether it existed
    pub fn remove(&mut self, id: AnimationId) -> bool {
        let existed = self.bindings.remove(id).is_some();
        if existed {
            self.order.retain(|&other| other != id);
        }
        existed
    }

    /// Drop bindings that target any of the given nodes
    pub fn forget_nodes(&mut self, nodes: &[NodeId]) -> usize {
        self.retain(|target| !matches!(target, AnimationTarget::Node(n) if nodes.contains(n)))
    }

    /// Drop bindings that target properties of `owner`
    pub fn forget_owner(&mut self, owner: O) -> usize {
        self.retain(|target| !matches!(target, AnimationTarget::Property { owner: o, .. } if *o == owner))
    }

    /// Apply every binding for `elapsed` seconds of simulation time
    ///
    /// Does nothing while stopped. Bindings whose node, owner or property no
    /// longer exists are pruned; values rejected by a domain are reported and the
    /// tick carries on.
    pub fn tick<C: 'static>(
        &mut self,
        elapsed: f32,
        scene: &mut Scene<C>,
        registry: &BindingRegistry<Scene<C>, O>,
    ) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_running() {
            log::trace!("Tick at {:.3}s ignored, driver stopped", elapsed);
            return report;
        }

        let mut stale = Vec::new();
        for &id in &self.order {
            let Some(binding) = self.bindings.get(id) else {
                continue;
            };

            match binding {
                AnimationBinding::Node { node, rule } => match scene.graph.local_mut(*node) {
                    Ok(local) => {
                        rule.apply(local, elapsed);
                        report.applied += 1;
                    }
                    Err(_) => stale.push(id),
                },
                AnimationBinding::Property { owner, name, rule } => {
                    match registry.write(scene, *owner, name, rule(elapsed)) {
                        Ok(()) => report.applied += 1,
                        Err(BindingError::OwnerGone(_) | BindingError::UnknownProperty { .. }) => {
                            stale.push(id);
                        }
                        Err(err) => {
                            log::warn!("Animation {:?} could not write {:?}.{}: {}", id, owner, name, err);
                            report.failures.push((id, err));
                        }
                    }
                }
            }
        }

        for id in stale {
            log::debug!("Pruning animation {:?}: target no longer exists", id);
            self.remove(id);
            report.pruned += 1;
        }

        log::trace!("Tick at {:.3}s applied {} binding(s)", elapsed, report.applied);
        report
    }

    fn insert(&mut self, binding: AnimationBinding<O>) -> AnimationId {
        let id = self.bindings.insert(binding);
        self.order.push(id);
        id
    }

    fn retain(&mut self, mut keep: impl FnMut(&AnimationTarget<O>) -> bool) -> usize {
        let bindings = &mut self.bindings;
        let before = self.order.len();
        self.order.retain(|&id| {
            let kept = bindings.get(id).map_or(false, |binding| keep(&binding.target()));
            if !kept {
                bindings.remove(id);
            }
            kept
        });
        before - self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{BoundProperty, Domain};
    use crate::foundation::math::{Transform, Vec3};
    use approx::assert_relative_eq;

    #[derive(Debug, Default)]
    struct Content {
        intensity: f64,
    }

    type TestScene = Scene<Content>;

    fn intensity_registry() -> BindingRegistry<TestScene, u8> {
        let mut registry = BindingRegistry::new();
        registry
            .register(
                0,
                "intensity",
                BoundProperty::number(
                    |scene: &TestScene, _| Some(scene.content.intensity),
                    |scene: &mut TestScene, _, value| {
                        scene.content.intensity = value;
                        Ok(())
                    },
                )
                .with_domain(Domain::range(0.0, 2.0)),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_stopped_driver_applies_nothing() {
        let mut scene = TestScene::default();
        let node = scene.graph.spawn_root("spinner", Transform::identity());
        let registry = BindingRegistry::new();
        let mut driver = AnimationDriver::<u8>::new();
        driver.add_node(node, NodeRule::spin_y(1.0));

        let report = driver.tick(1.0, &mut scene, &registry);
        assert_eq!(report.applied, 0);
        assert_eq!(scene.graph.local(node).unwrap(), &Transform::identity());

        driver.start();
        assert_eq!(driver.tick(1.0, &mut scene, &registry).applied, 1);
        driver.stop();
        assert_eq!(driver.state(), DriverState::Stopped);
    }

    #[test]
    fn test_ticking_same_time_is_idempotent() {
        let mut scene = TestScene::default();
        let root = scene.graph.spawn_root("root", Transform::identity());
        let orbit = scene
            .graph
            .spawn_child(root, "orbit", Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let registry = BindingRegistry::new();
        let mut driver = AnimationDriver::<u8>::new();
        driver.add_node(root, NodeRule::spin_y(1.0));
        driver.add_node(orbit, NodeRule::spin_y(2.0));
        driver.start();

        driver.tick(1.25, &mut scene, &registry);
        let first = scene.graph.world_transform(orbit).unwrap();
        driver.tick(1.25, &mut scene, &registry);
        let second = scene.graph.world_transform(orbit).unwrap();
        assert_relative_eq!(first, second);

        // Seeking back and forth lands on the same state
        driver.tick(7.0, &mut scene, &registry);
        driver.tick(1.25, &mut scene, &registry);
        assert_relative_eq!(scene.graph.world_transform(orbit).unwrap(), first);
    }

    #[test]
    fn test_registration_order_is_application_order() {
        let mut scene = TestScene::default();
        let node = scene.graph.spawn_root("node", Transform::identity());
        let registry = BindingRegistry::new();
        let mut driver = AnimationDriver::<u8>::new();
        driver.add_node(node, NodeRule::custom(|t, _| t.position.x = 1.0));
        driver.add_node(node, NodeRule::custom(|t, _| t.position.x = 2.0));
        driver.start();

        driver.tick(0.0, &mut scene, &registry);
        assert_relative_eq!(scene.graph.local(node).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_destroyed_targets_are_pruned() {
        let mut scene = TestScene::default();
        let keep = scene.graph.spawn_root("keep", Transform::identity());
        let gone = scene.graph.spawn_root("gone", Transform::identity());
        let registry = BindingRegistry::new();
        let mut driver = AnimationDriver::<u8>::new();
        driver.add_node(keep, NodeRule::spin_y(1.0));
        driver.add_node(gone, NodeRule::spin_y(1.0));
        driver.start();

        scene.graph.destroy(gone).unwrap();
        let report = driver.tick(1.0, &mut scene, &registry);

        assert_eq!(report.applied, 1);
        assert_eq!(report.pruned, 1);
        assert_eq!(driver.len(), 1);
    }

    #[test]
    fn test_property_animation_goes_through_domain() {
        let mut scene = TestScene::default();
        let registry = intensity_registry();
        let mut driver = AnimationDriver::new();
        let id = driver.add_property(0, "intensity", |t| PropertyValue::Number(f64::from(t)));
        driver.start();

        let report = driver.tick(1.5, &mut scene, &registry);
        assert_eq!(report.applied, 1);
        assert_relative_eq!(scene.content.intensity, 1.5);

        let report = driver.tick(3.0, &mut scene, &registry);
        assert_eq!(report.applied, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, id);
        assert_relative_eq!(scene.content.intensity, 1.5);
    }

    #[test]
    fn test_unbound_property_animation_is_pruned() {
        let mut scene = TestScene::default();
        let mut registry = intensity_registry();
        let mut driver = AnimationDriver::new();
        driver.add_property(0, "intensity", |_| PropertyValue::Number(1.0));
        driver.start();

        registry.unregister_owner(0);
        let report = driver.tick(0.0, &mut scene, &registry);

        assert_eq!(report.pruned, 1);
        assert!(report.failures.is_empty());
        assert!(driver.is_empty());
    }

    #[test]
    fn test_forget_owner_and_nodes() {
        let mut scene = TestScene::default();
        let node = scene.graph.spawn_root("node", Transform::identity());
        let mut driver = AnimationDriver::new();
        driver.add_node(node, NodeRule::spin_y(1.0));
        driver.add_property(3u8, "intensity", |_| PropertyValue::Number(0.0));
        driver.add_property(4u8, "intensity", |_| PropertyValue::Number(0.0));

        assert_eq!(driver.forget_owner(3), 1);
        assert_eq!(driver.forget_nodes(&[node]), 1);
        assert_eq!(driver.len(), 1);
        assert!(matches!(driver.target(driver.order[0]), Some(AnimationTarget::Property { owner: 4, .. })));
    }
}
