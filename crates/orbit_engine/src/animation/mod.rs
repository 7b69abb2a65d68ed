//! Time-driven animation
//!
//! `Stopped → Running` on [`AnimationDriver::start`]; running until
//! [`AnimationDriver::stop`]. Pausing is left to the host.

mod driver;
mod rules;

pub use driver::{AnimationDriver, AnimationTarget, DriverState, TickReport};
pub use rules::{NodeRule, PropertyRule};
