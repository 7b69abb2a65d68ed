//! City block scene
//!
//! A checkered ground plane, a cube and a sphere lit by one point light. The
//! light is exposed through bindings so a control panel can recolor, dim and
//! move it; moving it drags its gizmo along.

use orbit_engine::prelude::*;

use crate::content::{add_point_light, assets, DemoContent, DemoEngine, DemoScene, PointLight};

/// Side of the square ground plane
pub const PLANE_SIZE: f32 = 40.0;

/// Edge of the cube
pub const CUBE_SIZE: f32 = 4.0;

/// Radius of the sphere
pub const SPHERE_RADIUS: f32 = 3.0;

/// Node ids of the built scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityNodes {
    /// Ground plane
    pub ground: NodeId,
    /// Cube
    pub cube: NodeId,
    /// Sphere
    pub sphere: NodeId,
    /// Point light, owner of the light bindings
    pub light: NodeId,
    /// Gizmo following the light
    pub light_helper: NodeId,
}

/// One scripted control-panel edit
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedWrite {
    /// Frame at which the edit is queued
    pub frame: u32,
    /// Property name on the light
    pub name: &'static str,
    /// Value written
    pub value: PropertyValue,
}

/// The city block demo
#[derive(Debug, Default)]
pub struct CityBlock {
    nodes: Option<CityNodes>,
    script: Vec<ScriptedWrite>,
    rejected: usize,
}

impl CityBlock {
    /// Demo that replays `script` against the light
    pub fn new(script: Vec<ScriptedWrite>) -> Self {
        Self {
            nodes: None,
            script,
            rejected: 0,
        }
    }

    /// A short tour of every light control, including two edits that are refused
    pub fn with_default_script() -> Self {
        let write = |frame, name, value: PropertyValue| ScriptedWrite { frame, name, value };
        let number = PropertyValue::Number;
        Self::new(vec![
            write(30, "color", PropertyValue::from("#8AC8AC")),
            write(60, "intensity", number(1.5)),
            write(90, "x", number(5.0)),
            write(120, "distance", number(20.0)),
            write(150, "y", number(12.0)),
            write(180, "color", PropertyValue::from("sunset")),
            write(210, "z", number(-6.0)),
        ])
    }

    /// Nodes created by setup
    pub fn nodes(&self) -> Option<&CityNodes> {
        self.nodes.as_ref()
    }

    /// Scripted edits refused so far
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

fn primitive(name: &str, geometry: AssetHandle, material: AssetHandle, transform: Transform) -> TransformNode {
    TransformNode::new(name, transform).with_attachment(Attachment::Mesh { geometry, material })
}

/// Copy the light's position onto its node and gizmo
fn sync_light(scene: &mut DemoScene, owner: NodeId) {
    let Some(light) = light(scene, owner) else {
        return;
    };
    let position = light.position;
    let helper = light.helper;

    for node in std::iter::once(owner).chain(helper) {
        if let Ok(local) = scene.graph.local_mut(node) {
            local.position = position;
        }
    }
}

/// Light state of a node that is still in the graph
fn light(scene: &DemoScene, owner: NodeId) -> Option<&PointLight> {
    if !scene.graph.contains(owner) {
        return None;
    }
    scene.content.lights.get(&owner)
}

fn light_mut(scene: &mut DemoScene, owner: NodeId) -> Result<&mut PointLight, BindingError> {
    if !scene.graph.contains(owner) {
        return Err(BindingError::owner_gone(owner));
    }
    scene
        .content
        .lights
        .get_mut(&owner)
        .ok_or_else(|| BindingError::owner_gone(owner))
}

fn light_number(
    get: fn(&PointLight) -> f64,
    set: fn(&mut PointLight, f64),
) -> BoundProperty<DemoScene, NodeId> {
    BoundProperty::number(
        move |scene: &DemoScene, owner| light(scene, owner).map(get),
        move |scene: &mut DemoScene, owner, value| {
            set(light_mut(scene, owner)?, value);
            Ok(())
        },
    )
}

fn light_axis(axis: usize) -> BoundProperty<DemoScene, NodeId> {
    BoundProperty::number(
        move |scene: &DemoScene, owner| light(scene, owner).map(|light| f64::from(light.position[axis])),
        move |scene: &mut DemoScene, owner, value| {
            #[allow(clippy::cast_possible_truncation)]
            let value = value as f32;
            light_mut(scene, owner)?.position[axis] = value;
            Ok(())
        },
    )
    .with_domain(Domain::range(-10.0, 10.0))
    .on_write(sync_light)
}

/// Bind the light's color, intensity, distance and position
pub fn bind_light(engine: &mut DemoEngine, light: NodeId) -> Result<(), EngineError> {
    engine.bind(
        light,
        "color",
        BoundProperty::color(
            |scene: &DemoScene, owner| self::light(scene, owner).map(|light| light.color),
            |scene: &mut DemoScene, owner, color| {
                light_mut(scene, owner)?.color = color;
                Ok(())
            },
        ),
    )?;
    engine.bind(
        light,
        "intensity",
        light_number(|light| light.intensity, |light, value| light.intensity = value)
            .with_domain(Domain::range(0.0, 2.0)),
    )?;
    engine.bind(
        light,
        "distance",
        light_number(|light| light.distance, |light, value| light.distance = value)
            .with_domain(Domain::range(0.0, 40.0)),
    )?;
    for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
        engine.bind(light, name, light_axis(axis))?;
    }
    Ok(())
}

/// Build the city block graph, light and bindings
pub fn build(engine: &mut DemoEngine) -> Result<CityNodes, EngineError> {
    let graph = engine.graph_mut();

    let ground = graph.insert(primitive(
        "ground",
        assets::PLANE,
        assets::CHECKER_MATERIAL,
        Transform::identity()
            .with_rotation_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)
            .with_uniform_scale(PLANE_SIZE),
    ));
    graph.add_root(ground)?;

    let cube = graph.insert(primitive(
        "cube",
        assets::CUBE,
        assets::CUBE_MATERIAL,
        Transform::from_position(Vec3::new(CUBE_SIZE + 1.0, CUBE_SIZE / 2.0, 0.0))
            .with_uniform_scale(CUBE_SIZE),
    ));
    graph.add_root(cube)?;

    let sphere = graph.insert(primitive(
        "sphere",
        assets::SPHERE,
        assets::SPHERE_MATERIAL,
        Transform::from_position(Vec3::new(-SPHERE_RADIUS - 1.0, SPHERE_RADIUS + 2.0, 0.0))
            .with_uniform_scale(SPHERE_RADIUS),
    ));
    graph.add_root(sphere)?;

    let position = Vec3::new(0.0, 10.0, 0.0);
    let light = add_point_light(engine, "pointLight", PointLight::new(1.0).with_position(position))?;

    let light_helper = engine.graph_mut().insert(
        TransformNode::new("pointLightHelper", Transform::from_position(position))
            .with_attachment(Attachment::Helper(assets::LIGHT_GIZMO)),
    );
    engine.graph_mut().add_root(light_helper)?;
    if let Some(state) = engine.content_mut().lights.get_mut(&light) {
        state.helper = Some(light_helper);
    }

    bind_light(engine, light)?;

    log::info!(
        "City block built: {} node(s), {} binding(s)",
        engine.graph().len(),
        engine.bindings().len()
    );
    Ok(CityNodes {
        ground,
        cube,
        sphere,
        light,
        light_helper,
    })
}

impl Application for CityBlock {
    type Content = DemoContent;
    type Owner = NodeId;

    fn setup(&mut self, engine: &mut DemoEngine) -> Result<(), EngineError> {
        self.nodes = Some(build(engine)?);
        Ok(())
    }

    fn before_frame(&mut self, engine: &mut DemoEngine, frame: u32) {
        let Some(nodes) = self.nodes else {
            return;
        };
        for edit in self.script.iter().filter(|edit| edit.frame == frame) {
            log::debug!("Frame {}: light.{} = {}", frame, edit.name, edit.value);
            engine.queue_write(nodes.light, edit.name, edit.value.clone());
        }
    }

    fn after_frame(&mut self, engine: &mut DemoEngine, report: &FrameReport<NodeId>) {
        for (request, err) in &report.write_failures {
            log::info!("Control panel edit light.{} refused: {}", request.name, err);
        }
        self.rejected += report.write_failures.len();

        if !report.write_failures.is_empty() || report.resized {
            for entry in engine.snapshot() {
                match &entry.value {
                    Ok(value) => log::debug!("  {} = {}", entry.label, value),
                    Err(err) => log::debug!("  {} unreadable: {}", entry.label, err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{LoggingRenderer, SimulatedDisplay};
    use orbit_engine::foundation::math::translation_of;

    fn built() -> (DemoEngine, CityNodes) {
        let mut engine = DemoEngine::new(EngineConfig::default(), DemoContent::default()).unwrap();
        let nodes = build(&mut engine).unwrap();
        (engine, nodes)
    }

    #[test]
    fn test_color_reads_back_canonical_hex() {
        let (mut engine, nodes) = built();
        assert_eq!(engine.read(nodes.light, "color").unwrap(), PropertyValue::from("#FFFFFF"));

        engine
            .write_now(nodes.light, "color", PropertyValue::from("#8ac8ac"))
            .unwrap();
        assert_eq!(engine.read(nodes.light, "color").unwrap(), PropertyValue::from("#8AC8AC"));
    }

    #[test]
    fn test_moving_light_moves_gizmo() {
        let (mut engine, nodes) = built();
        engine
            .write_now(nodes.light, "x", PropertyValue::Number(5.0))
            .unwrap();

        let gizmo = engine.graph().world_transform(nodes.light_helper).unwrap();
        let light = engine.graph().world_transform(nodes.light).unwrap();
        assert_eq!(translation_of(&gizmo), Vec3::new(5.0, 10.0, 0.0));
        assert_eq!(translation_of(&light), Vec3::new(5.0, 10.0, 0.0));
    }

    #[test]
    fn test_out_of_range_edits_are_refused() {
        let (mut engine, nodes) = built();

        let err = engine
            .write_now(nodes.light, "intensity", PropertyValue::Number(3.0))
            .unwrap_err();
        assert!(matches!(err, BindingError::Domain { .. }));
        assert_eq!(engine.read(nodes.light, "intensity").unwrap(), PropertyValue::Number(1.0));

        let err = engine
            .write_now(nodes.light, "y", PropertyValue::Number(12.0))
            .unwrap_err();
        assert!(matches!(err, BindingError::Domain { .. }));
        assert_eq!(engine.read(nodes.light, "y").unwrap(), PropertyValue::Number(10.0));
    }

    #[test]
    fn test_distance_leaves_light_in_place() {
        let (mut engine, nodes) = built();
        engine.graph_mut().local_mut(nodes.light_helper).unwrap().position = Vec3::new(1.0, 1.0, 1.0);

        engine
            .write_now(nodes.light, "distance", PropertyValue::Number(20.0))
            .unwrap();

        assert_eq!(engine.read(nodes.light, "distance").unwrap(), PropertyValue::Number(20.0));
        let gizmo = engine.graph().world_transform(nodes.light_helper).unwrap();
        assert_eq!(translation_of(&gizmo), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_destroyed_light_drops_bindings() {
        let (mut engine, nodes) = built();
        assert!(engine.bindings().contains(nodes.light, "x"));

        engine.destroy_node(nodes.light).unwrap();

        for name in ["color", "intensity", "distance", "x", "y", "z"] {
            assert!(!engine.bindings().contains(nodes.light, name), "{name} still bound");
        }
        let err = engine
            .write_now(nodes.light, "x", PropertyValue::Number(3.0))
            .unwrap_err();
        assert!(matches!(err, BindingError::UnknownProperty { .. }));
        assert!(engine.read(nodes.light, "x").is_err());

        // The gizmo is a separate root and stays where it was
        let gizmo = engine.graph().world_transform(nodes.light_helper).unwrap();
        assert_eq!(translation_of(&gizmo), Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_default_script_run() {
        let mut engine = DemoEngine::new(EngineConfig::default(), DemoContent::default()).unwrap();
        let mut app = CityBlock::with_default_script();
        let mut display = SimulatedDisplay::new((300.0, 150.0), (600.0, 150.0), 1.0, 100);
        let mut renderer = LoggingRenderer::new(0);

        let summary = run_frames(&mut app, &mut engine, &mut display, &mut renderer, 240, 16.0).unwrap();

        assert_eq!(summary.rendered, 240);
        assert_eq!(summary.resizes, 1);
        assert_eq!(app.rejected(), 2);
        assert_eq!(display.backing(), (600, 150));

        let light = app.nodes().unwrap().light;
        let state = &engine.content().lights[&light];
        assert_eq!(state.color.to_hex(), "#8AC8AC");
        assert!((state.intensity - 1.5).abs() < f64::EPSILON);
        assert!((state.distance - 20.0).abs() < f64::EPSILON);
        assert_eq!(state.position, Vec3::new(5.0, 10.0, -6.0));
    }
}
