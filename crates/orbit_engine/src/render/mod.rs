//! Render-facing seams
//!
//! The kernel never issues draw calls. Each frame it hands a [`FramePacket`] to a
//! [`RenderSink`] and asks a [`DisplaySurface`] for its size; both are supplied
//! by the host.

pub mod camera;
pub mod viewport;

pub use camera::{CameraMatrices, PerspectiveCamera};
pub use viewport::{aspect_of, Viewport};

use bytemuck::{Pod, Zeroable};

use crate::foundation::collections::NodeId;
use crate::foundation::math::Mat4;
use crate::scene::Attachment;

/// Display collaborator: reports the on-screen size and receives resizes
pub trait DisplaySurface {
    /// Logical (CSS-style) width and height
    fn display_size(&self) -> (f32, f32);

    /// Device pixel ratio
    fn pixel_ratio(&self) -> f32;

    /// Reallocate the backing surface to exactly `width` x `height` pixels
    fn resize_backing(&mut self, width: u32, height: u32);
}

/// Renderer collaborator
pub trait RenderSink {
    /// Draw one frame
    fn render(&mut self, frame: &FramePacket<'_>);
}

/// Per-instance data laid out for GPU upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Column-major world matrix
    pub model: [[f32; 4]; 4],
}

impl From<&Mat4> for InstanceData {
    fn from(world: &Mat4) -> Self {
        Self {
            model: (*world).into(),
        }
    }
}

/// One drawable node
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem<'a> {
    /// Source node
    pub node: NodeId,
    /// Node name
    pub name: &'a str,
    /// World transform
    pub world: Mat4,
    /// Depth in the hierarchy
    pub depth: usize,
    /// Draw-order hint
    pub render_order: i32,
    /// What to draw
    pub attachment: Attachment,
}

impl DrawItem<'_> {
    /// World transform packed for upload
    pub fn instance_data(&self) -> InstanceData {
        InstanceData::from(&self.world)
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FramePacket<'a> {
    /// Simulation time of this frame in seconds
    pub time: f32,
    /// Output surface
    pub viewport: &'a Viewport,
    /// Camera matrices
    pub camera: CameraMatrices,
    /// Visible attached nodes in traversal order
    pub items: Vec<DrawItem<'a>>,
}

impl FramePacket<'_> {
    /// Items sorted by render order, traversal order kept within equal orders
    pub fn sorted_items(&self) -> Vec<&DrawItem<'_>> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by_key(|item| item.render_order);
        items
    }

    /// All instance data in render order, as raw bytes
    pub fn instance_bytes(&self) -> Vec<u8> {
        let instances: Vec<InstanceData> = self
            .sorted_items()
            .into_iter()
            .map(DrawItem::instance_data)
            .collect();
        bytemuck::cast_slice(&instances).to_vec()
    }
}
