//! Demo content kept beside the scene graph: helper pairs and lights

use std::collections::HashMap;

use orbit_engine::prelude::*;

/// Asset handles the logging renderer understands
pub mod assets {
    use orbit_engine::scene::AssetHandle;

    /// Unit sphere
    pub const SPHERE: AssetHandle = AssetHandle(1);
    /// Unit cube
    pub const CUBE: AssetHandle = AssetHandle(2);
    /// Unit plane
    pub const PLANE: AssetHandle = AssetHandle(3);
    /// Axes gizmo
    pub const AXES: AssetHandle = AssetHandle(10);
    /// Point light gizmo
    pub const LIGHT_GIZMO: AssetHandle = AssetHandle(11);
    /// Grid gizmos are `GRID_BASE + units`
    pub const GRID_BASE: u64 = 100;
    /// Emissive sun material
    pub const SUN_MATERIAL: AssetHandle = AssetHandle(1000);
    /// Blue earth material
    pub const EARTH_MATERIAL: AssetHandle = AssetHandle(1001);
    /// Grey moon material
    pub const MOON_MATERIAL: AssetHandle = AssetHandle(1002);
    /// Checker ground material; the texture is a placeholder
    pub const CHECKER_MATERIAL: AssetHandle = AssetHandle(1003);
    /// Plain cube material
    pub const CUBE_MATERIAL: AssetHandle = AssetHandle(1004);
    /// Plain sphere material
    pub const SPHERE_MATERIAL: AssetHandle = AssetHandle(1005);
    /// Light source
    pub const POINT_LIGHT: AssetHandle = AssetHandle(2000);
}

/// Axes and grid gizmos attached under a node, toggled together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisGridHelper {
    /// Axes node, drawn after the grid
    pub axes: NodeId,
    /// Grid node
    pub grid: NodeId,
    /// Grid size in world units
    pub units: u32,
}

impl AxisGridHelper {
    /// Axes render on top of the grid
    pub const AXES_ORDER: i32 = 2;
    /// Grid render order
    pub const GRID_ORDER: i32 = 1;
}

/// A point light's native state
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// Light color
    pub color: Rgb,
    /// Intensity multiplier
    pub intensity: f64,
    /// Cut-off distance, 0 means unlimited
    pub distance: f64,
    /// Position in world space
    pub position: Vec3,
    /// Gizmo node mirroring the position
    pub helper: Option<NodeId>,
}

impl PointLight {
    /// White light at the origin
    pub fn new(intensity: f64) -> Self {
        Self {
            color: Rgb::WHITE,
            intensity,
            distance: 0.0,
            position: Vec3::zeros(),
            helper: None,
        }
    }

    /// Builder pattern: Set distance
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

/// Everything the demos store beside the graph
#[derive(Debug, Default)]
pub struct DemoContent {
    /// Helpers keyed by the node they decorate
    pub helpers: HashMap<NodeId, AxisGridHelper>,
    /// Lights keyed by their node
    pub lights: HashMap<NodeId, PointLight>,
}

/// Engine specialised for the demos
pub type DemoEngine = Engine<DemoContent, NodeId>;

/// Scene specialised for the demos
pub type DemoScene = Scene<DemoContent>;

/// Add an [`AxisGridHelper`] under `node` and bind its `visible` flag
///
/// Both gizmos start hidden. A node carries at most one helper.
pub fn add_axis_grid(engine: &mut DemoEngine, node: NodeId, units: u32) -> Result<AxisGridHelper, EngineError> {
    let label = engine.graph().node(node)?.name.clone();
    if engine.bindings().contains(node, "visible") {
        return Err(BindingError::Duplicate {
            owner: label,
            name: "visible".to_string(),
        }
        .into());
    }
    let graph = engine.graph_mut();

    let axes = graph.insert(
        TransformNode::new(format!("{label}.axes"), Transform::identity())
            .with_attachment(Attachment::Helper(assets::AXES))
            .with_render_order(AxisGridHelper::AXES_ORDER)
            .with_visible(false),
    );
    graph.attach(node, axes)?;

    let grid = graph.insert(
        TransformNode::new(format!("{label}.grid"), Transform::identity())
            .with_attachment(Attachment::Helper(AssetHandle(assets::GRID_BASE + u64::from(units))))
            .with_render_order(AxisGridHelper::GRID_ORDER)
            .with_visible(false),
    );
    graph.attach(node, grid)?;

    let helper = AxisGridHelper { axes, grid, units };
    engine.content_mut().helpers.insert(node, helper);

    engine.bind(
        node,
        "visible",
        BoundProperty::boolean(
            |scene: &DemoScene, owner| {
                let helper = scene.content.helpers.get(&owner)?;
                scene.graph.node(helper.axes).ok().map(|axes| axes.visible)
            },
            |scene: &mut DemoScene, owner, visible| {
                let helper = *scene
                    .content
                    .helpers
                    .get(&owner)
                    .ok_or_else(|| BindingError::owner_gone(owner))?;
                for gizmo in [helper.axes, helper.grid] {
                    scene
                        .graph
                        .set_visible(gizmo, visible)
                        .map_err(|_| BindingError::owner_gone(owner))?;
                }
                Ok(())
            },
        )
        .with_label(label),
    )?;

    Ok(helper)
}

/// Create a root light node at the light's position and record its state
pub fn add_point_light(engine: &mut DemoEngine, name: &str, light: PointLight) -> Result<NodeId, EngineError> {
    let node = engine.graph_mut().insert(
        TransformNode::new(name, Transform::from_position(light.position))
            .with_attachment(Attachment::Light(assets::POINT_LIGHT)),
    );
    engine.graph_mut().add_root(node)?;
    engine.content_mut().lights.insert(node, light);
    Ok(node)
}
