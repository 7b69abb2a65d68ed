//! Headless demo scenes for the orbit engine
//!
//! Two scenes, each runnable as its own binary:
//!
//! - `solar_system`: nested spinning pivots carrying a sun, an earth and a moon
//! - `city_block`: a ground plane, a cube and a sphere under a controllable point light
//!
//! Both run against a simulated display and a renderer that only logs.

pub mod city_block;
pub mod content;
pub mod harness;
pub mod solar_system;
