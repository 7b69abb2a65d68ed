//! Update rules
//!
//! Every rule is a function of elapsed simulation time only, never of the value
//! it overwrites. Re-applying a rule at the same time gives the same result, so
//! ticks are replayable and seeking is just ticking at another time.

use std::fmt;

use crate::binding::PropertyValue;
use crate::foundation::math::{Quat, Transform, Unit, Vec3};

/// Time-driven mutation of a node's local transform
pub enum NodeRule {
    /// Rotation set to `rate * t` radians about `axis`
    Spin {
        /// Rotation axis, normalized on use; a zero axis leaves the rotation untouched
        axis: Vec3,
        /// Radians per second
        rate: f32,
    },
    /// Position moved around a circle in the XZ plane of the parent frame
    Orbit {
        /// Circle radius
        radius: f32,
        /// Radians per second
        rate: f32,
        /// Angle at `t = 0`
        phase: f32,
    },
    /// Arbitrary rule; must only depend on the elapsed time it is given
    Custom(Box<dyn Fn(&mut Transform, f32) + Send>),
}

impl NodeRule {
    /// Spin about +Y, as the solar system bodies do
    pub fn spin_y(rate: f32) -> Self {
        Self::Spin { axis: Vec3::y(), rate }
    }

    /// Custom rule
    pub fn custom(rule: impl Fn(&mut Transform, f32) + Send + 'static) -> Self {
        Self::Custom(Box::new(rule))
    }

    /// Apply the rule for elapsed time `t` in seconds
    pub fn apply(&self, transform: &mut Transform, t: f32) {
        match self {
            Self::Spin { axis, rate } => {
                if let Some(axis) = Unit::try_new(*axis, f32::EPSILON) {
                    transform.rotation = Quat::from_axis_angle(&axis, rate * t);
                }
            }
            Self::Orbit { radius, rate, phase } => {
                let angle = phase + rate * t;
                transform.position.x = radius * angle.cos();
                transform.position.z = -radius * angle.sin();
            }
            Self::Custom(rule) => rule(transform, t),
        }
    }
}

impl fmt::Debug for NodeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spin { axis, rate } => f
                .debug_struct("Spin")
                .field("axis", axis)
                .field("rate", rate)
                .finish(),
            Self::Orbit { radius, rate, phase } => f
                .debug_struct("Orbit")
                .field("radius", radius)
                .field("rate", rate)
                .field("phase", phase)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Produces a property value for elapsed time `t` in seconds
pub type PropertyRule = Box<dyn Fn(f32) -> PropertyValue + Send>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spin_is_absolute() {
        let rule = NodeRule::spin_y(1.0);
        let mut transform = Transform::identity();

        rule.apply(&mut transform, 0.5);
        let first = transform.rotation;
        rule.apply(&mut transform, 0.5);

        assert_relative_eq!(transform.rotation, first);
        assert_relative_eq!(transform.rotation.angle(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_spin_about_zero_axis_keeps_rotation() {
        let rule = NodeRule::Spin {
            axis: Vec3::zeros(),
            rate: 1.0,
        };
        let mut transform = Transform::identity().with_rotation_euler(0.0, 0.25, 0.0);
        let before = transform.rotation;

        rule.apply(&mut transform, 2.0);

        assert!(transform.rotation.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(transform.rotation, before);
    }

    #[test]
    fn test_orbit_keeps_height() {
        let rule = NodeRule::Orbit {
            radius: 10.0,
            rate: std::f32::consts::FRAC_PI_2,
            phase: 0.0,
        };
        let mut transform = Transform::from_position(Vec3::new(0.0, 3.0, 0.0));

        rule.apply(&mut transform, 1.0);
        assert_relative_eq!(transform.position, Vec3::new(0.0, 3.0, -10.0), epsilon = 1e-5);
    }
}
