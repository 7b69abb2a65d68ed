//! # Engine Configuration
//!
//! Everything a host can tune without touching code: log level, simulation speed,
//! the initial display surface and the perspective camera.
//!
//! Defaults describe a 300x150 surface at pixel ratio 1 and a 40 degree camera
//! 50 units above the origin looking down with +Z up.
//!
//! ## Example (TOML)
//!
//! ```toml
//! log_level = "debug"
//! time_scale = 1.0
//! frame_budget = 600
//! stats_interval = 120
//!
//! [viewport]
//! width = 1280.0
//! height = 720.0
//! pixel_ratio = 2.0
//!
//! [camera]
//! fov_degrees = 40.0
//! near = 0.1
//! far = 1000.0
//! position = [0.0, 50.0, 0.0]
//! target = [0.0, 0.0, 0.0]
//! up = [0.0, 0.0, 1.0]
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Initial display surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Logical width in CSS-style pixels
    pub width: f32,
    /// Logical height in CSS-style pixels
    pub height: f32,
    /// Device pixel ratio
    pub pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 150.0,
            pixel_ratio: 1.0,
        }
    }
}

impl ViewportConfig {
    /// Display of the given logical size and pixel ratio
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }
}

/// Perspective camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Initial aspect ratio, replaced on the first viewport reconciliation
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Eye position
    pub position: [f32; 3],
    /// Look-at target
    pub target: [f32; 3],
    /// Up vector
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            aspect: 2.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 50.0, 0.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Simulation seconds per host second
    pub time_scale: f32,
    /// Frames a headless host runs before stopping
    pub frame_budget: u32,
    /// Log frame statistics every this many frames (0 disables)
    pub stats_interval: u32,
    /// Initial display surface
    pub viewport: ViewportConfig,
    /// Camera parameters
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            time_scale: 1.0,
            frame_budget: 600,
            stats_interval: 120,
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set simulation speed
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set the headless frame budget
    pub fn with_frame_budget(mut self, frames: u32) -> Self {
        self.frame_budget = frames;
        self
    }

    /// Set the initial display surface
    pub fn with_viewport(mut self, viewport: ViewportConfig) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set camera parameters
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be a non-negative number, got {}",
                self.time_scale
            )));
        }

        let viewport = &self.viewport;
        if !(viewport.pixel_ratio.is_finite() && viewport.pixel_ratio > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport.pixel_ratio must be positive, got {}",
                viewport.pixel_ratio
            )));
        }
        if viewport.width < 0.0 || viewport.height < 0.0 {
            return Err(ConfigError::Invalid("viewport size cannot be negative".to_string()));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }

        Ok(())
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            log_level = "debug"

            [viewport]
            pixel_ratio = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!((config.viewport.pixel_ratio - 2.0).abs() < f32::EPSILON);
        assert!((config.viewport.width - 300.0).abs() < f32::EPSILON);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_ron_parse() {
        let config = EngineConfig::from_ron_str("(time_scale: 0.5, frame_budget: 10)").unwrap();
        assert_eq!(config.frame_budget, 10);
        assert!((config.time_scale - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_inverted_clip_planes() {
        let mut config = EngineConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        // Format is checked before anything touches the filesystem
        let err = EngineConfig::default().save_to_file("engine.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
