//! Archetype templates and the archetype document loader
//!
//! Document shape:
//!
//! ```json
//! {
//!     "Ball": {
//!         "velocity": { "x": 250.0, "y": 250.0 },
//!         "direction": { "x": 0.0, "y": -1.0 },
//!         "children": [],
//!         "components": [
//!             { "SceneComponent_0": { "transform": { "scale": { "x": 18.0, "y": 18.0, "z": 0.0 } } } },
//!             { "PhysicsComponent_0": { "shape_type": "Circle", "collider_weight": 1.0 } }
//!         ]
//!     }
//! }
//! ```
//!
//! A child entry is a single-key object `{"<Name>_<n>": body}`. When `<Name>`
//! is an archetype known to the loader the body is a set of overrides on top
//! of it (velocity, direction, properties, components, children). Otherwise
//! the body must be a complete inline definition.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use super::overrides::apply_overrides;
use super::{single_entry, LoadError};
use crate::ecs::component::{split_indexed_name, Component, ComponentKey, ComponentSet};
use crate::ecs::components::SceneComponent;
use crate::ecs::properties::Properties;
use crate::ecs::registry::{ComponentRegistry, DecodeError};
use crate::foundation::math::{utils, Vec2};

/// Definition fields with a fixed meaning; everything else is a property
pub(crate) const RESERVED_FIELDS: [&str; 4] = ["velocity", "direction", "children", "components"];

/// Immutable template entities are spawned from
#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    name: String,
    velocity: Vec2,
    direction: Vec2,
    components: ComponentSet,
    children: Vec<Archetype>,
    properties: Properties,
}

impl Archetype {
    /// Create an empty archetype (no motion, no components, no children)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            velocity: Vec2::zeros(),
            direction: Vec2::zeros(),
            components: ComponentSet::new(),
            children: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Set the per-axis speed
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the heading (normalized)
    pub fn with_direction(mut self, direction: Vec2) -> Self {
        self.set_direction(direction);
        self
    }

    /// Append a component under the next free ordinal of its kind
    pub fn with_component(mut self, component: Component) -> Self {
        self.push_component(component);
        self
    }

    /// Append a child template
    pub fn with_child(mut self, child: Archetype) -> Self {
        self.children.push(child);
        self
    }

    /// Set a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(name, value);
        self
    }

    /// Append a component under the next free ordinal of its kind
    pub fn push_component(&mut self, component: Component) -> ComponentKey {
        let tag = component.type_name();
        let mut ordinal = 0;
        while self.components.contains(&ComponentKey::new(tag, ordinal)) {
            ordinal += 1;
        }
        let key = ComponentKey::new(tag, ordinal);
        // The key was just checked to be free
        let _ = self.components.insert(key.clone(), component);
        key
    }

    /// Archetype name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default per-axis speed
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Default heading (unit length or zero)
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Components in declaration order
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Child templates in declaration order
    pub fn children(&self) -> &[Archetype] {
        &self.children
    }

    /// Game properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub(crate) fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub(crate) fn set_direction(&mut self, direction: Vec2) {
        self.direction = utils::normalize_or_zero(direction);
    }

    pub(crate) fn components_mut(&mut self) -> &mut ComponentSet {
        &mut self.components
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Archetype] {
        &mut self.children
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

/// Parses archetype documents into [`Archetype`] values
///
/// Named child references resolve against the definitions registered with
/// [`add_source`](Self::add_source).
pub struct ArchetypeLoader<'r> {
    registry: &'r ComponentRegistry,
    sources: HashMap<String, Value>,
}

impl<'r> ArchetypeLoader<'r> {
    /// Create a loader decoding components with `registry`
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            sources: HashMap::new(),
        }
    }

    /// Make a raw definition available to named child references
    pub fn add_source(&mut self, name: impl Into<String>, definition: Value) {
        self.sources.insert(name.into(), definition);
    }

    /// Load a document holding a single named archetype
    pub fn load(&self, document: &Value) -> Result<Archetype, LoadError> {
        let (name, definition) = single_entry(document, "archetype document")?;
        let mut open = Vec::new();
        self.load_definition(name, definition, &mut open)
    }

    /// Load a document from JSON text
    pub fn load_str(&self, text: &str) -> Result<Archetype, LoadError> {
        let document: Value = serde_json::from_str(text)?;
        self.load(&document)
    }

    /// Load a document from a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Archetype, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let archetype = self.load_str(&text)?;
        log::debug!("Loaded archetype {} from {}", archetype.name(), path.display());
        Ok(archetype)
    }

    /// Load the known definition `name`
    pub(crate) fn load_named(&self, name: &str) -> Result<Archetype, LoadError> {
        let mut open = Vec::new();
        self.load_reference(name, &mut open)
    }

    fn load_reference(&self, name: &str, open: &mut Vec<String>) -> Result<Archetype, LoadError> {
        if open.iter().any(|n| n == name) {
            let mut chain = open.clone();
            chain.push(name.to_string());
            return Err(LoadError::CyclicChildReference { chain });
        }
        let definition = self
            .sources
            .get(name)
            .ok_or_else(|| LoadError::UnknownArchetype(name.to_string()))?;
        self.load_definition(name, definition, open)
    }

    fn load_definition(
        &self,
        name: &str,
        definition: &Value,
        open: &mut Vec<String>,
    ) -> Result<Archetype, LoadError> {
        let definition = definition
            .as_object()
            .ok_or_else(|| LoadError::malformed(format!("archetype `{name}` must be an object")))?;

        open.push(name.to_string());
        let result = self.decode_definition(name, definition, open);
        open.pop();
        result
    }

    fn decode_definition(
        &self,
        name: &str,
        definition: &Map<String, Value>,
        open: &mut Vec<String>,
    ) -> Result<Archetype, LoadError> {
        let mut archetype = Archetype::new(name);

        if let Some(velocity) = definition.get("velocity") {
            archetype.set_velocity(read_vec2(velocity, name, "velocity")?);
        }
        if let Some(direction) = definition.get("direction") {
            archetype.set_direction(read_vec2(direction, name, "direction")?);
        }

        let components = required_array(definition, name, "components")?;
        for (index, entry) in components.iter().enumerate() {
            let what = format!("archetype `{name}` component #{index}");
            let (key, attributes) = single_entry(entry, &what)?;
            let key = ComponentKey::parse(key).ok_or_else(|| {
                LoadError::malformed(format!("{what}: key `{key}` is not of the form <Type>_<ordinal>"))
            })?;

            let component = self
                .registry
                .decode(key.tag(), attributes)
                .map_err(|source| LoadError::ComponentDecode {
                    archetype: name.to_string(),
                    index,
                    source,
                })?;

            if archetype.components.insert(key.clone(), component).is_err() {
                return Err(LoadError::malformed(format!("{what}: duplicate key `{key}`")));
            }
        }

        let children = required_array(definition, name, "children")?;

        let scenes = archetype.components.count_kind(SceneComponent::TAG);
        if scenes != 1 {
            return Err(LoadError::ComponentDecode {
                archetype: name.to_string(),
                index: components.len(),
                source: DecodeError::InvalidComponentSchema {
                    component: SceneComponent::TAG.to_string(),
                    field: SceneComponent::TAG.to_string(),
                    reason: format!("must appear exactly once, found {scenes}"),
                },
            });
        }

        for (index, entry) in children.iter().enumerate() {
            let what = format!("archetype `{name}` child #{index}");
            let (key, body) = single_entry(entry, &what)?;
            let child_name = split_indexed_name(key).map_or(key, |(base, _)| base);
            let body = body
                .as_object()
                .ok_or_else(|| LoadError::malformed(format!("{what} must be an object")))?;

            let is_reference = self.sources.contains_key(child_name) || open.iter().any(|n| n == child_name);
            let child = if is_reference || !body.contains_key("components") {
                let mut child = self.load_reference(child_name, open)?;
                apply_overrides(self.registry, &mut child, body)?;
                child
            } else {
                open.push(child_name.to_string());
                let inline = self.decode_definition(child_name, body, open);
                open.pop();
                inline?
            };
            archetype.children.push(child);
        }

        let properties: Map<String, Value> = definition
            .iter()
            .filter(|(field, _)| !RESERVED_FIELDS.contains(&field.as_str()))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        archetype.properties = Properties::from(properties);

        Ok(archetype)
    }
}

fn required_array<'a>(
    definition: &'a Map<String, Value>,
    name: &str,
    field: &str,
) -> Result<&'a Vec<Value>, LoadError> {
    definition
        .get(field)
        .ok_or_else(|| LoadError::malformed(format!("archetype `{name}` is missing `{field}`")))?
        .as_array()
        .ok_or_else(|| LoadError::malformed(format!("archetype `{name}` field `{field}` must be an array")))
}

/// Read an `{x, y}` object; missing axes are zero
pub(crate) fn read_vec2(value: &Value, name: &str, field: &str) -> Result<Vec2, LoadError> {
    let axes = value
        .as_object()
        .ok_or_else(|| LoadError::malformed(format!("archetype `{name}` field `{field}` must be an object")))?;

    let mut out = Vec2::zeros();
    for (index, axis) in ["x", "y"].into_iter().enumerate() {
        if let Some(component) = axes.get(axis) {
            #[allow(clippy::cast_possible_truncation)]
            let number = component
                .as_f64()
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    LoadError::malformed(format!("archetype `{name}` field `{field}.{axis}` must be a finite number"))
                })?;
            out[index] = number;
        }
    }
    Ok(out)
}
