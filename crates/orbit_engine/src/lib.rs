//! # Orbit Engine
//!
//! A small retained-mode scene kernel.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed transform hierarchy with cycle-checked reparenting
//! - **Animation**: Pure time-driven rules applied once per frame
//! - **Viewport Reconciliation**: Backing surface tracks display size and pixel ratio
//! - **Attribute Bindings**: Get/set rule pairs with value domains for live control panels
//!
//! ## Quick Start
//!
//! ```rust
//! use orbit_engine::prelude::*;
//!
//! struct Spinner;
//!
//! impl Application for Spinner {
//!     type Content = ();
//!     type Owner = NodeId;
//!
//!     fn setup(&mut self, engine: &mut Engine<(), NodeId>) -> Result<(), EngineError> {
//!         let root = engine.graph_mut().spawn_root("root", Transform::identity());
//!         engine.animate_node(root, NodeRule::spin_y(1.0));
//!         Ok(())
//!     }
//! }
//!
//! struct Fixed;
//!
//! impl DisplaySurface for Fixed {
//!     fn display_size(&self) -> (f32, f32) { (300.0, 150.0) }
//!     fn pixel_ratio(&self) -> f32 { 1.0 }
//!     fn resize_backing(&mut self, _width: u32, _height: u32) {}
//! }
//!
//! struct Discard;
//!
//! impl RenderSink for Discard {
//!     fn render(&mut self, _frame: &FramePacket<'_>) {}
//! }
//!
//! let mut engine = Engine::new(EngineConfig::default(), ())?;
//! let summary = run_frames(&mut Spinner, &mut engine, &mut Fixed, &mut Discard, 10, 16.0)?;
//! assert_eq!(summary.rendered, 10);
//! # Ok::<(), EngineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

pub mod animation;
pub mod binding;
pub mod render;
pub mod scene;

mod application;
mod engine;

#[cfg(test)]
mod tests;

pub use application::{run_frames, Application, RunSummary};
pub use crate::core::{EngineConfig, EngineError};
pub use engine::{Engine, FrameReport, FrameStatus, WriteRequest};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationDriver, AnimationTarget, DriverState, NodeRule, TickReport},
        binding::{BindingRegistry, BoundProperty, Domain, PropertyValue, Rgb, ValueKind},
        core::{
            BindingError, CameraConfig, Config, ConfigError, EngineConfig, EngineError,
            SceneError, ViewportConfig,
        },
        foundation::{
            collections::{AnimationId, NodeId},
            math::{Mat4, Quat, Transform, Vec3},
            time::{FrameStats, SimClock},
        },
        render::{DisplaySurface, DrawItem, FramePacket, PerspectiveCamera, RenderSink, Viewport},
        run_frames,
        scene::{AssetHandle, Attachment, Scene, SceneGraph, TransformNode, Visit},
        Application, Engine, FrameReport, FrameStatus, RunSummary,
    };
}
