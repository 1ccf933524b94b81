//! Component values and per-entity component sets
//!
//! Entities may carry several components of the same kind, so components are
//! addressed by a [`ComponentKey`] (type tag plus ordinal) instead of by
//! struct field. A [`ComponentSet`] keeps them in declaration order.

use std::fmt;

use super::components::{GraphicsComponent, InputComponent, PhysicsComponent, SceneComponent};
use super::registry::Attributes;

/// A decoded component
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Transform
    Scene(SceneComponent),
    /// Collider
    Physics(PhysicsComponent),
    /// Render binding
    Graphics(GraphicsComponent),
    /// Player control marker
    Input(InputComponent),
}

impl Component {
    /// Tag of the built-in kind this value belongs to
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scene(_) => SceneComponent::TAG,
            Self::Physics(_) => PhysicsComponent::TAG,
            Self::Graphics(_) => GraphicsComponent::TAG,
            Self::Input(_) => InputComponent::TAG,
        }
    }

    /// Scene payload, if this is a scene component
    pub fn as_scene(&self) -> Option<&SceneComponent> {
        match self {
            Self::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    /// Physics payload, if this is a physics component
    pub fn as_physics(&self) -> Option<&PhysicsComponent> {
        match self {
            Self::Physics(physics) => Some(physics),
            _ => None,
        }
    }

    /// Graphics payload, if this is a graphics component
    pub fn as_graphics(&self) -> Option<&GraphicsComponent> {
        match self {
            Self::Graphics(graphics) => Some(graphics),
            _ => None,
        }
    }

    /// Attribute object that decodes back to this value
    pub fn to_attributes(&self) -> Attributes {
        match self {
            Self::Scene(scene) => scene.to_attributes(),
            Self::Physics(physics) => physics.to_attributes(),
            Self::Graphics(graphics) => graphics.to_attributes(),
            Self::Input(_) => Attributes::new(),
        }
    }
}

/// Component address: document type tag plus ordinal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    tag: String,
    ordinal: u32,
}

impl ComponentKey {
    /// Create a key
    pub fn new(tag: impl Into<String>, ordinal: u32) -> Self {
        Self {
            tag: tag.into(),
            ordinal,
        }
    }

    /// Parse a `"<Type>_<ordinal>"` document key
    ///
    /// The ordinal is everything after the last underscore and must be a
    /// non-negative integer; the tag must be non-empty.
    pub fn parse(key: &str) -> Option<Self> {
        let (tag, ordinal) = split_indexed_name(key)?;
        Some(Self::new(tag, ordinal))
    }

    /// Type tag
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Ordinal discriminator
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.tag, self.ordinal)
    }
}

/// Split `"Name_3"` into `("Name", 3)`
pub(crate) fn split_indexed_name(key: &str) -> Option<(&str, u32)> {
    let (name, index) = key.rsplit_once('_')?;
    if name.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((name, index.parse().ok()?))
}

/// Ordered mapping from [`ComponentKey`] to [`Component`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSet {
    entries: Vec<(ComponentKey, Component)>,
}

impl ComponentSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component
    ///
    /// Returns the component back if the key is already taken.
    pub fn insert(&mut self, key: ComponentKey, component: Component) -> Result<(), Component> {
        if self.contains(&key) {
            return Err(component);
        }
        self.entries.push((key, component));
        Ok(())
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Component by key
    pub fn get(&self, key: &ComponentKey) -> Option<&Component> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Mutable component by key
    pub fn get_mut(&mut self, key: &ComponentKey) -> Option<&mut Component> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Replace the component stored under `key`, keeping its position
    pub fn replace(&mut self, key: &ComponentKey, component: Component) -> Option<Component> {
        self.get_mut(key).map(|slot| std::mem::replace(slot, component))
    }

    /// All components in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentKey, &Component)> + '_ {
        self.entries.iter().map(|(k, c)| (k, c))
    }

    /// Components whose key carries `tag`, in declaration order
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (&'a ComponentKey, &'a Component)> + 'a {
        self.iter().filter(move |(k, _)| k.tag() == tag)
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the set holds no components
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first scene component
    pub fn scene(&self) -> Option<&SceneComponent> {
        self.entries.iter().find_map(|(_, c)| c.as_scene())
    }

    /// The first scene component, mutably
    pub fn scene_mut(&mut self) -> Option<&mut SceneComponent> {
        self.entries.iter_mut().find_map(|(_, c)| match c {
            Component::Scene(scene) => Some(scene),
            _ => None,
        })
    }

    /// The lowest-ordinal physics component (the entity's collider)
    pub fn physics(&self) -> Option<&PhysicsComponent> {
        self.entries
            .iter()
            .filter_map(|(key, c)| c.as_physics().map(|physics| (key.ordinal(), physics)))
            .min_by_key(|(ordinal, _)| *ordinal)
            .map(|(_, physics)| physics)
    }

    /// The first graphics component
    pub fn graphics(&self) -> Option<&GraphicsComponent> {
        self.entries.iter().find_map(|(_, c)| c.as_graphics())
    }

    /// The first graphics component, mutably
    pub fn graphics_mut(&mut self) -> Option<&mut GraphicsComponent> {
        self.entries.iter_mut().find_map(|(_, c)| match c {
            Component::Graphics(graphics) => Some(graphics),
            _ => None,
        })
    }

    /// All graphics components, in declaration order
    pub fn all_graphics(&self) -> impl Iterator<Item = &GraphicsComponent> + '_ {
        self.entries.iter().filter_map(|(_, c)| c.as_graphics())
    }

    /// Whether any input component is present
    pub fn has_input(&self) -> bool {
        self.entries.iter().any(|(_, c)| matches!(c, Component::Input(_)))
    }

    /// Count of components of a built-in kind
    pub fn count_kind(&self, type_name: &str) -> usize {
        self.entries
            .iter()
            .filter(|(_, c)| c.type_name() == type_name)
            .count()
    }
}
