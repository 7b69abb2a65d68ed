//! Attribute binding registry
//!
//! A control surface addresses a property by `(owner, name)`. The registry holds
//! only the owner's lookup key; the owner itself lives in the target store `T`
//! (usually a [`Scene`](crate::scene::Scene)) and is handed to the rules on every
//! call. An owner that has since been destroyed reads as
//! [`BindingError::OwnerGone`] instead of dangling.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::core::error::BindingError;

use super::color::Rgb;
use super::domain::Domain;
use super::value::{PropertyValue, ValueKind};

/// Reads the current value; `None` when the owner no longer exists
pub type GetRule<T, O> = Box<dyn Fn(&T, O) -> Option<PropertyValue> + Send>;

/// Converts a validated value back into the owner's representation
pub type SetRule<T, O> = Box<dyn Fn(&mut T, O, PropertyValue) -> Result<(), BindingError> + Send>;

/// Re-synchronizes dependent state after a successful write
pub type FollowUp<T, O> = Box<dyn Fn(&mut T, O) + Send>;

/// Bound owner key
pub trait OwnerKey: Copy + Eq + Hash + Debug + 'static {}

impl<K: Copy + Eq + Hash + Debug + 'static> OwnerKey for K {}

/// A named property exposed to a control surface
pub struct BoundProperty<T, O> {
    kind: ValueKind,
    get: GetRule<T, O>,
    set: SetRule<T, O>,
    domain: Option<Domain>,
    label: Option<String>,
    on_write: Option<FollowUp<T, O>>,
}

impl<T, O> Debug for BoundProperty<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundProperty")
            .field("kind", &self.kind)
            .field("domain", &self.domain)
            .field("label", &self.label)
            .field("on_write", &self.on_write.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: 'static, O: OwnerKey> BoundProperty<T, O> {
    /// Property with raw get/set rules over [`PropertyValue`]
    pub fn new(
        kind: ValueKind,
        get: impl Fn(&T, O) -> Option<PropertyValue> + Send + 'static,
        set: impl Fn(&mut T, O, PropertyValue) -> Result<(), BindingError> + Send + 'static,
    ) -> Self {
        Self {
            kind,
            get: Box::new(get),
            set: Box::new(set),
            domain: None,
            label: None,
            on_write: None,
        }
    }

    /// Numeric property
    pub fn number(
        get: impl Fn(&T, O) -> Option<f64> + Send + 'static,
        set: impl Fn(&mut T, O, f64) -> Result<(), BindingError> + Send + 'static,
    ) -> Self {
        Self::new(
            ValueKind::Number,
            move |target, owner| get(target, owner).map(PropertyValue::Number),
            move |target, owner, value| set(target, owner, value.as_number()?),
        )
    }

    /// Boolean property
    pub fn boolean(
        get: impl Fn(&T, O) -> Option<bool> + Send + 'static,
        set: impl Fn(&mut T, O, bool) -> Result<(), BindingError> + Send + 'static,
    ) -> Self {
        Self::new(
            ValueKind::Bool,
            move |target, owner| get(target, owner).map(PropertyValue::Bool),
            move |target, owner, value| set(target, owner, value.as_bool()?),
        )
    }

    /// Text property
    pub fn text(
        get: impl Fn(&T, O) -> Option<String> + Send + 'static,
        set: impl Fn(&mut T, O, String) -> Result<(), BindingError> + Send + 'static,
    ) -> Self {
        Self::new(
            ValueKind::Text,
            move |target, owner| get(target, owner).map(PropertyValue::Text),
            move |target, owner, value| set(target, owner, value.as_text()?.to_string()),
        )
    }

    /// Hex color string over an [`Rgb`] triple stored by the owner
    ///
    /// Reads render the triple as canonical `#RRGGBB`; writes parse the string
    /// back before the owner is touched.
    pub fn color(
        get: impl Fn(&T, O) -> Option<Rgb> + Send + 'static,
        set: impl Fn(&mut T, O, Rgb) -> Result<(), BindingError> + Send + 'static,
    ) -> Self {
        Self::new(
            ValueKind::Text,
            move |target, owner| get(target, owner).map(|rgb| PropertyValue::Text(rgb.to_hex())),
            move |target, owner, value| set(target, owner, Rgb::from_hex(value.as_text()?)?),
        )
        .with_domain(Domain::HexColor)
    }

    /// Builder pattern: Set domain
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Builder pattern: Set display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder pattern: Run `follow_up` after every successful write
    pub fn on_write(mut self, follow_up: impl Fn(&mut T, O) + Send + 'static) -> Self {
        self.on_write = Some(Box::new(follow_up));
        self
    }

    /// Declared kind
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Declared domain
    pub fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    /// Display label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Current value of one binding, as listed by [`BindingRegistry::snapshot`]
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySnapshot<O> {
    /// Owner key
    pub owner: O,
    /// Property name
    pub name: String,
    /// Display label, falling back to the name
    pub label: String,
    /// Declared kind
    pub kind: ValueKind,
    /// Declared domain
    pub domain: Option<Domain>,
    /// Current value, or why it could not be read
    pub value: Result<PropertyValue, BindingError>,
}

/// Registry of bound properties over a target store `T` keyed by owner `O`
pub struct BindingRegistry<T, O> {
    properties: HashMap<(O, String), BoundProperty<T, O>>,
    order: Vec<(O, String)>,
}

impl<T, O: Debug> Debug for BindingRegistry<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("bindings", &self.order)
            .finish()
    }
}

impl<T: 'static, O: OwnerKey> Default for BindingRegistry<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static, O: OwnerKey> BindingRegistry<T, O> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no bindings are registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `(owner, name)` is bound
    pub fn contains(&self, owner: O, name: &str) -> bool {
        self.properties.contains_key(&(owner, name.to_string()))
    }

    /// Register a property
    ///
    /// Fails with [`BindingError::Duplicate`] when `(owner, name)` is already bound;
    /// the existing binding is kept.
    pub fn register(
        &mut self,
        owner: O,
        name: impl Into<String>,
        property: BoundProperty<T, O>,
    ) -> Result<(), BindingError> {
        let key = (owner, name.into());
        if self.properties.contains_key(&key) {
            return Err(BindingError::Duplicate {
                owner: format!("{owner:?}"),
                name: key.1,
            });
        }

        log::trace!("Bound {:?}.{} ({})", owner, key.1, property.kind.name());
        self.order.push(key.clone());
        self.properties.insert(key, property);
        Ok(())
    }

    /// Remove one binding; returns whether it existed
    pub fn unregister(&mut self, owner: O, name: &str) -> bool {
        let key = (owner, name.to_string());
        let existed = self.properties.remove(&key).is_some();
        if existed {
            self.order.retain(|k| *k != key);
        }
        existed
    }

    /// Remove every binding of an owner; returns how many were removed
    pub fn unregister_owner(&mut self, owner: O) -> usize {
        self.retain_owners(|o| o != owner)
    }

    /// Keep only bindings whose owner passes `keep`; returns how many were removed
    pub fn retain_owners(&mut self, mut keep: impl FnMut(O) -> bool) -> usize {
        let before = self.order.len();
        let properties = &mut self.properties;
        self.order.retain(|key| {
            let kept = keep(key.0);
            if !kept {
                properties.remove(key);
            }
            kept
        });
        before - self.order.len()
    }

    /// Drop bindings whose owner no longer resolves in `target`
    pub fn prune_orphaned(&mut self, target: &T) -> usize {
        let properties = &mut self.properties;
        let before = self.order.len();
        self.order.retain(|key| {
            let alive = properties
                .get(key)
                .is_some_and(|property| (property.get)(target, key.0).is_some());
            if !alive {
                log::debug!("Dropping binding {:?}.{}: owner gone", key.0, key.1);
                properties.remove(key);
            }
            alive
        });
        before - self.order.len()
    }

    /// Borrow a binding
    pub fn property(&self, owner: O, name: &str) -> Result<&BoundProperty<T, O>, BindingError> {
        self.properties
            .get(&(owner, name.to_string()))
            .ok_or_else(|| BindingError::UnknownProperty {
                owner: format!("{owner:?}"),
                name: name.to_string(),
            })
    }

    /// Read the current value through the get rule
    pub fn read(&self, target: &T, owner: O, name: &str) -> Result<PropertyValue, BindingError> {
        let property = self.property(owner, name)?;
        (property.get)(target, owner).ok_or_else(|| BindingError::owner_gone(owner))
    }

    /// Validate and write a value, then run the follow-up
    ///
    /// Kind and domain are checked before the set rule runs, so a rejected value
    /// never reaches the owner.
    pub fn write(
        &self,
        target: &mut T,
        owner: O,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), BindingError> {
        let property = self.property(owner, name)?;

        if value.kind() != property.kind {
            return Err(value.mismatch(property.kind));
        }
        if let Some(domain) = &property.domain {
            domain.check(&value)?;
        }

        log::debug!("Write {:?}.{} = {}", owner, name, value);
        (property.set)(target, owner, value)?;

        if let Some(follow_up) = &property.on_write {
            follow_up(target, owner);
        }
        Ok(())
    }

    /// Every binding with its current value, in registration order
    pub fn snapshot(&self, target: &T) -> Vec<PropertySnapshot<O>> {
        self.order
            .iter()
            .filter_map(|key| self.properties.get(key).map(|property| (key, property)))
            .map(|((owner, name), property)| PropertySnapshot {
                owner: *owner,
                name: name.clone(),
                label: property.label.clone().unwrap_or_else(|| name.clone()),
                kind: property.kind,
                domain: property.domain.clone(),
                value: (property.get)(target, *owner).ok_or_else(|| BindingError::owner_gone(*owner)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Light {
        color: Rgb,
        intensity: f32,
        helper_x: f32,
        x: f32,
    }

    type Lights = HashMap<u32, Light>;

    fn lights() -> Lights {
        let mut lights = HashMap::new();
        lights.insert(
            1,
            Light {
                color: Rgb::WHITE,
                intensity: 1.0,
                helper_x: 0.0,
                x: 0.0,
            },
        );
        lights
    }

    fn registry() -> BindingRegistry<Lights, u32> {
        let mut registry = BindingRegistry::new();
        registry
            .register(
                1,
                "intensity",
                BoundProperty::number(
                    |lights: &Lights, id| lights.get(&id).map(|l| f64::from(l.intensity)),
                    |lights: &mut Lights, id, value| {
                        let light = lights.get_mut(&id).ok_or_else(|| BindingError::owner_gone(id))?;
                        light.intensity = value as f32;
                        Ok(())
                    },
                )
                .with_domain(Domain::range(0.0, 2.0)),
            )
            .unwrap();
        registry
            .register(
                1,
                "color",
                BoundProperty::color(
                    |lights: &Lights, id| lights.get(&id).map(|l| l.color),
                    |lights: &mut Lights, id, rgb| {
                        let light = lights.get_mut(&id).ok_or_else(|| BindingError::owner_gone(id))?;
                        light.color = rgb;
                        Ok(())
                    },
                ),
            )
            .unwrap();
        registry
            .register(
                1,
                "x",
                BoundProperty::number(
                    |lights: &Lights, id| lights.get(&id).map(|l| f64::from(l.x)),
                    |lights: &mut Lights, id, value| {
                        let light = lights.get_mut(&id).ok_or_else(|| BindingError::owner_gone(id))?;
                        light.x = value as f32;
                        Ok(())
                    },
                )
                .with_domain(Domain::range(-10.0, 10.0))
                .on_write(|lights: &mut Lights, id| {
                    if let Some(light) = lights.get_mut(&id) {
                        light.helper_x = light.x;
                    }
                }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let mut registry = registry();
        let err = registry
            .register(
                1,
                "intensity",
                BoundProperty::number(|_: &Lights, _| Some(42.0), |_: &mut Lights, _, _| Ok(())),
            )
            .unwrap_err();

        assert!(matches!(err, BindingError::Duplicate { .. }));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.read(&lights(), 1, "intensity").unwrap(), PropertyValue::Number(1.0));
    }

    #[test]
    fn test_out_of_domain_write_leaves_owner_unchanged() {
        let registry = registry();
        let mut lights = lights();

        registry.write(&mut lights, 1, "intensity", 1.5.into()).unwrap();
        let err = registry.write(&mut lights, 1, "intensity", 5.0.into()).unwrap_err();

        assert!(matches!(err, BindingError::Domain { .. }));
        assert_relative_eq!(lights[&1].intensity, 1.5);
        assert_eq!(registry.read(&lights, 1, "intensity").unwrap(), PropertyValue::Number(1.5));
    }

    #[test]
    fn test_hex_color_round_trip() {
        let registry = registry();
        let mut lights = lights();

        registry.write(&mut lights, 1, "color", "#8AC8AC".into()).unwrap();
        assert_eq!(registry.read(&lights, 1, "color").unwrap(), PropertyValue::from("#8AC8AC"));
        assert_relative_eq!(lights[&1].color.r, 138.0 / 255.0);

        // Lowercase input normalizes
        registry.write(&mut lights, 1, "color", "#ff8000".into()).unwrap();
        assert_eq!(registry.read(&lights, 1, "color").unwrap(), PropertyValue::from("#FF8000"));
    }

    #[test]
    fn test_malformed_color_is_domain_error() {
        let registry = registry();
        let mut lights = lights();

        let err = registry.write(&mut lights, 1, "color", "#12".into()).unwrap_err();
        assert!(matches!(err, BindingError::Domain { .. }));
        assert_eq!(lights[&1].color, Rgb::WHITE);
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();
        let mut lights = lights();

        let err = registry.write(&mut lights, 1, "intensity", "1.0".into()).unwrap_err();
        assert_eq!(err, BindingError::TypeMismatch { expected: "number", actual: "text" });
    }

    #[test]
    fn test_follow_up_runs_only_after_success() {
        let registry = registry();
        let mut lights = lights();

        registry.write(&mut lights, 1, "x", 4.0.into()).unwrap();
        assert_relative_eq!(lights[&1].helper_x, 4.0);

        assert!(registry.write(&mut lights, 1, "x", 40.0.into()).is_err());
        assert_relative_eq!(lights[&1].helper_x, 4.0);
    }

    #[test]
    fn test_owner_gone() {
        let registry = registry();
        let mut lights = lights();
        lights.clear();

        assert!(matches!(registry.read(&lights, 1, "intensity"), Err(BindingError::OwnerGone(_))));
        assert!(matches!(
            registry.write(&mut lights, 1, "intensity", 1.0.into()),
            Err(BindingError::OwnerGone(_))
        ));
    }

    #[test]
    fn test_prune_orphaned() {
        let mut registry = registry();
        let mut lights = lights();

        assert_eq!(registry.prune_orphaned(&lights), 0);
        lights.clear();
        assert_eq!(registry.prune_orphaned(&lights), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_property() {
        let registry = registry();
        assert!(matches!(
            registry.read(&lights(), 2, "intensity"),
            Err(BindingError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_snapshot_and_unregister() {
        let mut registry = registry();
        let lights = lights();

        let names: Vec<_> = registry.snapshot(&lights).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["intensity", "color", "x"]);

        assert!(registry.unregister(1, "color"));
        assert!(!registry.unregister(1, "color"));
        assert_eq!(registry.unregister_owner(1), 2);
        assert!(registry.is_empty());
    }
}
