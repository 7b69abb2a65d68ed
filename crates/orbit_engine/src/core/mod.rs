//! # Core Engine Module
//!
//! Shared configuration and error types used by every subsystem.

pub mod config;
pub mod error;

pub use config::{CameraConfig, Config, ConfigError, EngineConfig, ViewportConfig};
pub use error::{BindingError, EngineError, SceneError};
