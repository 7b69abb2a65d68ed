//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Arena key types
//! - Simulation clock and frame statistics
//! - Logging utilities

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
