//! Solar system scene
//!
//! A spinning system root carries the sun and an orbit pivot for the earth;
//! the earth pivot carries the earth and a non-spinning pivot for the moon.
//! Rotating a pivot sweeps everything under it around its origin.

use orbit_engine::prelude::*;

use crate::content::{add_axis_grid, add_point_light, assets, DemoContent, DemoEngine, PointLight};

/// Radians per second every spinning body turns about +Y
pub const SPIN_RATE: f32 = 1.0;

/// Grid size for the system root's helper
pub const SYSTEM_GRID_UNITS: u32 = 25;

/// Grid size for every other helper
pub const BODY_GRID_UNITS: u32 = 10;

/// Node ids of the built scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarNodes {
    /// System root
    pub system: NodeId,
    /// Sun body
    pub sun: NodeId,
    /// Earth orbit pivot
    pub earth_orbit: NodeId,
    /// Earth body
    pub earth: NodeId,
    /// Moon orbit pivot
    pub moon_orbit: NodeId,
    /// Moon body
    pub moon: NodeId,
    /// Light at the origin
    pub light: NodeId,
}

impl SolarNodes {
    /// Every node that receives an axis/grid helper
    pub fn bodies(&self) -> [NodeId; 6] {
        [
            self.system,
            self.sun,
            self.earth_orbit,
            self.earth,
            self.moon_orbit,
            self.moon,
        ]
    }
}

/// The solar system demo
#[derive(Debug, Default)]
pub struct SolarSystem {
    nodes: Option<SolarNodes>,
    reveal_helpers_at: Option<u32>,
}

impl SolarSystem {
    /// Build on setup; show every helper once `frame` is reached
    pub fn new(reveal_helpers_at: Option<u32>) -> Self {
        Self {
            nodes: None,
            reveal_helpers_at,
        }
    }

    /// Nodes created by setup
    pub fn nodes(&self) -> Option<&SolarNodes> {
        self.nodes.as_ref()
    }
}

fn body(name: &str, material: AssetHandle, scale: f32) -> TransformNode {
    TransformNode::new(name, Transform::identity().with_uniform_scale(scale)).with_attachment(Attachment::Mesh {
        geometry: assets::SPHERE,
        material,
    })
}

/// Build the solar system graph, its animations, helpers and light
pub fn build(engine: &mut DemoEngine) -> Result<SolarNodes, EngineError> {
    let graph = engine.graph_mut();

    let system = graph.spawn_root("solarSystem", Transform::identity());

    let sun = graph.insert(body("sun", assets::SUN_MATERIAL, 5.0));
    graph.attach(system, sun)?;

    let earth_orbit = graph.spawn_child(
        system,
        "earthOrbit",
        Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
    )?;

    let earth = graph.insert(body("earth", assets::EARTH_MATERIAL, 1.0));
    graph.attach(earth_orbit, earth)?;

    let moon_orbit = graph.spawn_child(
        earth_orbit,
        "moonOrbit",
        Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
    )?;

    let moon = graph.insert(body("moon", assets::MOON_MATERIAL, 0.5));
    graph.attach(moon_orbit, moon)?;

    let light = add_point_light(engine, "pointLight", PointLight::new(500.0))?;

    let nodes = SolarNodes {
        system,
        sun,
        earth_orbit,
        earth,
        moon_orbit,
        moon,
        light,
    };

    // The moon's pivot stays still so the moon keeps its place beside the earth
    for node in [system, sun, earth_orbit, earth, moon] {
        engine.animate_node(node, NodeRule::spin_y(SPIN_RATE));
    }

    for node in nodes.bodies() {
        let units = if node == system {
            SYSTEM_GRID_UNITS
        } else {
            BODY_GRID_UNITS
        };
        add_axis_grid(engine, node, units)?;
    }

    log::info!(
        "Solar system built: {} node(s), {} animation(s), {} binding(s)",
        engine.graph().len(),
        engine.driver().len(),
        engine.bindings().len()
    );
    Ok(nodes)
}

impl Application for SolarSystem {
    type Content = DemoContent;
    type Owner = NodeId;

    fn setup(&mut self, engine: &mut DemoEngine) -> Result<(), EngineError> {
        self.nodes = Some(build(engine)?);
        Ok(())
    }

    fn before_frame(&mut self, engine: &mut DemoEngine, frame: u32) {
        if self.reveal_helpers_at != Some(frame) {
            return;
        }
        if let Some(nodes) = &self.nodes {
            log::info!("Showing axis/grid helpers at frame {}", frame);
            for node in nodes.bodies() {
                engine.queue_write(node, "visible", PropertyValue::Bool(true));
            }
        }
    }

    fn after_frame(&mut self, engine: &mut DemoEngine, report: &FrameReport<NodeId>) {
        if report.resized {
            log::info!(
                "Viewport now {}x{}, camera aspect {:.3}",
                engine.viewport().backing_width(),
                engine.viewport().backing_height(),
                engine.camera().aspect()
            );
        }
    }
}
