//! Live attribute bindings
//!
//! Lets an external control panel edit arbitrary object properties, including
//! derived ones, without the objects knowing about the panel. Each binding is an
//! explicit pair of rules: `get` renders the owner's state into a
//! [`PropertyValue`], `set` performs the inverse transform back into the owner's
//! native representation. A color stored as an [`Rgb`] triple can therefore be
//! edited as a `#RRGGBB` string.
//!
//! ```rust
//! use std::collections::HashMap;
//! use orbit_engine::binding::{BindingRegistry, BoundProperty, Domain, PropertyValue};
//! use orbit_engine::core::BindingError;
//!
//! let mut intensities: HashMap<u32, f64> = HashMap::from([(7, 1.0)]);
//! let mut registry = BindingRegistry::new();
//! registry.register(
//!     7,
//!     "intensity",
//!     BoundProperty::number(
//!         |map: &HashMap<u32, f64>, id| map.get(&id).copied(),
//!         |map: &mut HashMap<u32, f64>, id, value| {
//!             *map.get_mut(&id).ok_or_else(|| BindingError::owner_gone(id))? = value;
//!             Ok(())
//!         },
//!     )
//!     .with_domain(Domain::range(0.0, 2.0)),
//! )?;
//!
//! assert!(registry.write(&mut intensities, 7, "intensity", PropertyValue::Number(5.0)).is_err());
//! assert_eq!(registry.read(&intensities, 7, "intensity")?, PropertyValue::Number(1.0));
//! # Ok::<(), BindingError>(())
//! ```

mod color;
mod domain;
mod registry;
mod value;

pub use color::Rgb;
pub use domain::Domain;
pub use registry::{
    BindingRegistry, BoundProperty, FollowUp, GetRule, OwnerKey, PropertySnapshot, SetRule,
};
pub use value::{PropertyValue, ValueKind};
