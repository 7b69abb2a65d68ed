//! Frame context
//!
//! [`Engine`] owns everything one scene needs (graph, host content, animation
//! driver, binding registry, viewport, camera, clock) and threads it through
//! each frame in a fixed order:
//!
//! 1. queued control-surface writes are applied
//! 2. the animation driver ticks at the current simulation time
//! 3. the viewport is reconciled against the display (camera aspect follows)
//! 4. the graph is traversed and the frame handed to the renderer
//!
//! Independent engines share nothing, so several scenes (or tests) can coexist.

use crate::animation::{AnimationDriver, NodeRule, TickReport};
use crate::binding::{BindingRegistry, BoundProperty, OwnerKey, PropertySnapshot, PropertyValue};
use crate::core::config::EngineConfig;
use crate::core::error::{BindingError, EngineError, SceneError};
use crate::foundation::collections::{AnimationId, NodeId};
use crate::foundation::time::{FrameStats, SimClock};
use crate::render::{aspect_of, DisplaySurface, DrawItem, FramePacket, PerspectiveCamera, RenderSink, Viewport};
use crate::scene::{Scene, SceneGraph};

/// A control-surface edit waiting for the next frame
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest<O> {
    /// Owner key
    pub owner: O,
    /// Property name
    pub name: String,
    /// New value
    pub value: PropertyValue,
}

/// Whether a frame did any work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame was ticked, reconciled and rendered
    Rendered,
    /// The driver is stopped; nothing happened
    Stopped,
}

/// Outcome of one frame
#[derive(Debug)]
pub struct FrameReport<O> {
    /// Whether the frame ran
    pub status: FrameStatus,
    /// Simulation time in seconds
    pub time: f32,
    /// Whether the backing surface was resized
    pub resized: bool,
    /// Items handed to the renderer
    pub draw_count: usize,
    /// Animation results
    pub tick: TickReport,
    /// Queued writes that were rejected
    pub write_failures: Vec<(WriteRequest<O>, BindingError)>,
}

impl<O> FrameReport<O> {
    fn stopped(time: f32) -> Self {
        Self {
            status: FrameStatus::Stopped,
            time,
            resized: false,
            draw_count: 0,
            tick: TickReport::default(),
            write_failures: Vec::new(),
        }
    }
}

/// Scene kernel context
///
/// `C` is the host content stored beside the graph, `O` the owner key used by
/// bindings.
pub struct Engine<C, O> {
    scene: Scene<C>,
    driver: AnimationDriver<O>,
    bindings: BindingRegistry<Scene<C>, O>,
    viewport: Viewport,
    camera: PerspectiveCamera,
    clock: SimClock,
    stats: FrameStats,
    pending_writes: Vec<WriteRequest<O>>,
    config: EngineConfig,
}

impl<C: std::fmt::Debug, O: std::fmt::Debug> std::fmt::Debug for Engine<C, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scene", &self.scene)
            .field("driver", &self.driver)
            .field("bindings", &self.bindings)
            .field("viewport", &self.viewport)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<C: 'static, O: OwnerKey> Engine<C, O> {
    /// Create an engine around host content
    pub fn new(config: EngineConfig, content: C) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing engine: {}x{} @ {}x, time scale {}",
            config.viewport.width,
            config.viewport.height,
            config.viewport.pixel_ratio,
            config.time_scale
        );

        let viewport = Viewport::from_config(&config.viewport);
        let mut camera = PerspectiveCamera::from_config(&config.camera);
        camera.set_aspect(viewport.aspect());

        Ok(Self {
            scene: Scene::new(content),
            driver: AnimationDriver::new(),
            bindings: BindingRegistry::new(),
            viewport,
            camera,
            clock: SimClock::new(config.time_scale),
            stats: FrameStats::new(),
            pending_writes: Vec::new(),
            config,
        })
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Graph and content
    pub fn scene(&self) -> &Scene<C> {
        &self.scene
    }

    /// Mutable graph and content
    pub fn scene_mut(&mut self) -> &mut Scene<C> {
        &mut self.scene
    }

    /// Scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.scene.graph
    }

    /// Mutable scene graph
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene.graph
    }

    /// Host content
    pub fn content(&self) -> &C {
        &self.scene.content
    }

    /// Mutable host content
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.scene.content
    }

    /// Animation driver
    pub fn driver(&self) -> &AnimationDriver<O> {
        &self.driver
    }

    /// Mutable animation driver
    pub fn driver_mut(&mut self) -> &mut AnimationDriver<O> {
        &mut self.driver
    }

    /// Binding registry
    pub fn bindings(&self) -> &BindingRegistry<Scene<C>, O> {
        &self.bindings
    }

    /// Current viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Camera
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Mutable camera
    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    /// Simulation clock
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Frame statistics
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Start animating; frames run from now on
    pub fn start(&mut self) {
        self.driver.start();
    }

    /// Stop animating; frames become no-ops
    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Whether frames are being run
    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Animate a node's local transform
    pub fn animate_node(&mut self, node: NodeId, rule: NodeRule) -> AnimationId {
        self.driver.add_node(node, rule)
    }

    /// Animate a bound property
    pub fn animate_property(
        &mut self,
        owner: O,
        name: impl Into<String>,
        rule: impl Fn(f32) -> PropertyValue + Send + 'static,
    ) -> AnimationId {
        self.driver.add_property(owner, name, rule)
    }

    /// Expose a property to the control surface
    pub fn bind(
        &mut self,
        owner: O,
        name: impl Into<String>,
        property: BoundProperty<Scene<C>, O>,
    ) -> Result<(), BindingError> {
        self.bindings.register(owner, name, property)
    }

    /// Read a bound property
    pub fn read(&self, owner: O, name: &str) -> Result<PropertyValue, BindingError> {
        self.bindings.read(&self.scene, owner, name)
    }

    /// Write a bound property immediately
    pub fn write_now(&mut self, owner: O, name: &str, value: PropertyValue) -> Result<(), BindingError> {
        self.bindings.write(&mut self.scene, owner, name, value)
    }

    /// Queue a write for the start of the next frame
    pub fn queue_write(&mut self, owner: O, name: impl Into<String>, value: PropertyValue) {
        self.pending_writes.push(WriteRequest {
            owner,
            name: name.into(),
            value,
        });
    }

    /// Current value of every binding, for a control surface
    pub fn snapshot(&self) -> Vec<PropertySnapshot<O>> {
        self.bindings.snapshot(&self.scene)
    }

    /// Destroy a node and its subtree along with everything referring to it
    ///
    /// Animations on removed nodes and bindings whose owner no longer resolves
    /// are dropped.
    pub fn destroy_node(&mut self, node: NodeId) -> Result<Vec<NodeId>, SceneError> {
        let removed = self.scene.graph.destroy(node)?;
        let animations = self.driver.forget_nodes(&removed);
        let bindings = self.bindings.prune_orphaned(&self.scene);
        log::debug!(
            "Destroyed {} node(s), dropped {} animation(s) and {} binding(s)",
            removed.len(),
            animations,
            bindings
        );
        Ok(removed)
    }

    /// Drop every binding and property animation of an owner
    pub fn forget_owner(&mut self, owner: O) {
        self.bindings.unregister_owner(owner);
        self.driver.forget_owner(owner);
    }

    /// Run one frame at host timestamp `host_ms`
    pub fn frame(
        &mut self,
        host_ms: f64,
        display: &mut dyn DisplaySurface,
        renderer: &mut dyn RenderSink,
    ) -> FrameReport<O> {
        if !self.driver.is_running() {
            return FrameReport::stopped(self.clock.elapsed());
        }

        let write_failures = self.apply_pending_writes();

        let time = self.clock.advance_to(host_ms);
        let tick = self.driver.tick(time, &mut self.scene, &self.bindings);

        let resized = self.reconcile_viewport(display);

        let draw_count = self.render(time, renderer);

        self.stats.record(host_ms);
        self.log_stats();

        FrameReport {
            status: FrameStatus::Rendered,
            time,
            resized,
            draw_count,
            tick,
            write_failures,
        }
    }

    fn apply_pending_writes(&mut self) -> Vec<(WriteRequest<O>, BindingError)> {
        let mut failures = Vec::new();
        for request in std::mem::take(&mut self.pending_writes) {
            if let Err(err) =
                self.bindings
                    .write(&mut self.scene, request.owner, &request.name, request.value.clone())
            {
                log::warn!("Rejected write to {:?}.{}: {}", request.owner, request.name, err);
                failures.push((request, err));
            }
        }
        failures
    }

    fn reconcile_viewport(&mut self, display: &mut dyn DisplaySurface) -> bool {
        let (width, height) = display.display_size();
        let pixel_ratio = display.pixel_ratio();
        if !self.viewport.reconcile(width, height, pixel_ratio) {
            return false;
        }

        let (backing_width, backing_height) = self.viewport.backing_size();
        display.resize_backing(backing_width, backing_height);
        self.camera.set_aspect(aspect_of(width, height));
        true
    }

    fn render(&self, time: f32, renderer: &mut dyn RenderSink) -> usize {
        let graph = &self.scene.graph;
        let items: Vec<DrawItem<'_>> = graph
            .traverse_all()
            .filter(|visit| visit.visible)
            .filter_map(|visit| {
                let node = graph.node(visit.id).ok()?;
                Some(DrawItem {
                    node: visit.id,
                    name: &node.name,
                    world: visit.world,
                    depth: visit.depth,
                    render_order: node.render_order,
                    attachment: node.attachment?,
                })
            })
            .collect();

        let packet = FramePacket {
            time,
            viewport: &self.viewport,
            camera: self.camera.matrices(),
            items,
        };
        renderer.render(&packet);
        packet.items.len()
    }

    fn log_stats(&self) {
        let interval = u64::from(self.config.stats_interval);
        if interval > 0 && self.stats.frame_count() % interval == 0 {
            log::debug!(
                "Frame {}: {:.1} fps ({:.2} ms), {} node(s)",
                self.stats.frame_count(),
                self.stats.fps(),
                self.stats.last_frame_ms(),
                self.scene.graph.len()
            );
        }
    }
}
