//! Arena key types
//!
//! Scene objects live in slot maps and are addressed by generational keys, so a
//! stale id from a destroyed node never aliases a newer one.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable identifier of a node in a [`SceneGraph`](crate::scene::SceneGraph)
    pub struct NodeId;

    /// Identifier of a registered animation binding
    pub struct AnimationId;
}
