//! Component registry
//!
//! Maps a document type tag such as `"PhysicsComponent"` to a decoder that
//! turns the schema-less attribute object into a typed [`Component`]. Anything
//! without a registered decoder is rejected at the format boundary, so the
//! rest of the engine only ever sees the closed component enum.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::component::Component;
use super::components::{GraphicsComponent, InputComponent, PhysicsComponent, SceneComponent};
use crate::foundation::math::Vec3;

/// Raw attribute object of one component entry
pub type Attributes = serde_json::Map<String, Value>;

/// Component decoding errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No decoder registered for the tag
    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    /// A required field is missing or holds an unusable value
    #[error("Invalid {component} schema: field `{field}` {reason}")]
    InvalidComponentSchema {
        /// Type tag of the component being decoded
        component: String,
        /// Offending field, dotted for nested fields
        field: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Decodes one component kind from its attribute object
///
/// Implemented for plain functions and closures of the same shape, so
/// registering a new kind is usually a one-liner.
pub trait ComponentDecoder: Send + Sync {
    /// Decode `attributes` for the entry tagged `tag`
    fn decode(&self, tag: &str, attributes: &Attributes) -> Result<Component, DecodeError>;
}

impl<F> ComponentDecoder for F
where
    F: Fn(&str, &Attributes) -> Result<Component, DecodeError> + Send + Sync,
{
    fn decode(&self, tag: &str, attributes: &Attributes) -> Result<Component, DecodeError> {
        self(tag, attributes)
    }
}

/// Registry of component decoders keyed by type tag
pub struct ComponentRegistry {
    decoders: HashMap<String, Box<dyn ComponentDecoder>>,
}

impl ComponentRegistry {
    /// Create a registry with no decoders
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a decoder for a type tag, replacing any previous one
    pub fn register(&mut self, tag: impl Into<String>, decoder: impl ComponentDecoder + 'static) {
        let tag = tag.into();
        if self.decoders.insert(tag.clone(), Box::new(decoder)).is_some() {
            log::warn!("Component decoder for {tag} was replaced");
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, tag: impl Into<String>, decoder: impl ComponentDecoder + 'static) -> Self {
        self.register(tag, decoder);
        self
    }

    /// Check whether a tag has a decoder
    pub fn is_registered(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Decode a component
    pub fn decode(&self, tag: &str, attributes: &Value) -> Result<Component, DecodeError> {
        let decoder = self
            .decoders
            .get(tag)
            .ok_or_else(|| DecodeError::UnknownComponentType(tag.to_string()))?;
        let attributes = attributes.as_object().ok_or_else(|| DecodeError::InvalidComponentSchema {
            component: tag.to_string(),
            field: "<attributes>".to_string(),
            reason: "must be an object".to_string(),
        })?;
        decoder.decode(tag, attributes)
    }
}

impl Default for ComponentRegistry {
    /// Registry with the four built-in component kinds
    fn default() -> Self {
        Self::empty()
            .with(SceneComponent::TAG, |tag: &str, attrs: &Attributes| {
                SceneComponent::decode(&Fields::new(tag, attrs)).map(Component::Scene)
            })
            .with(PhysicsComponent::TAG, |tag: &str, attrs: &Attributes| {
                PhysicsComponent::decode(&Fields::new(tag, attrs)).map(Component::Physics)
            })
            .with(GraphicsComponent::TAG, |tag: &str, attrs: &Attributes| {
                GraphicsComponent::decode(&Fields::new(tag, attrs)).map(Component::Graphics)
            })
            .with(InputComponent::TAG, |_tag: &str, _attrs: &Attributes| {
                Ok(Component::Input(InputComponent))
            })
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ComponentRegistry").field("tags", &tags).finish()
    }
}

/// Typed accessors over an attribute object
///
/// Every failure names the component and the field so document errors can be
/// fixed without a debugger.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    component: &'a str,
    prefix: Option<&'a str>,
    attributes: &'a Attributes,
}

impl<'a> Fields<'a> {
    /// Wrap the attributes of a component tagged `component`
    pub fn new(component: &'a str, attributes: &'a Attributes) -> Self {
        Self {
            component,
            prefix: None,
            attributes,
        }
    }

    fn path(&self, field: &str) -> String {
        match self.prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        }
    }

    /// Build a schema error for `field`
    pub fn invalid(&self, field: &str, reason: impl Into<String>) -> DecodeError {
        DecodeError::InvalidComponentSchema {
            component: self.component.to_string(),
            field: self.path(field),
            reason: reason.into(),
        }
    }

    fn required(&self, field: &str) -> Result<&'a Value, DecodeError> {
        self.attributes
            .get(field)
            .ok_or_else(|| self.invalid(field, "is missing"))
    }

    /// Nested object that must be present
    pub fn object(&self, field: &'a str) -> Result<Fields<'a>, DecodeError> {
        let attributes = self
            .required(field)?
            .as_object()
            .ok_or_else(|| self.invalid(field, "must be an object"))?;
        Ok(Fields {
            component: self.component,
            prefix: Some(field),
            attributes,
        })
    }

    /// String that must be present
    pub fn str(&self, field: &str) -> Result<&'a str, DecodeError> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "must be a string"))
    }

    /// Finite number that must be present
    pub fn f32(&self, field: &str) -> Result<f32, DecodeError> {
        let value = self.required(field)?;
        self.number(field, value)
    }

    /// Finite number, if present
    pub fn opt_f32(&self, field: &str) -> Result<Option<f32>, DecodeError> {
        self.attributes
            .get(field)
            .map(|value| self.number(field, value))
            .transpose()
    }

    /// Unsigned 32-bit integer, if present
    pub fn opt_u32(&self, field: &str) -> Result<Option<u32>, DecodeError> {
        self.attributes
            .get(field)
            .map(|value| {
                value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| self.invalid(field, "must be an unsigned 32-bit integer"))
            })
            .transpose()
    }

    /// `{x, y, z}` object, if present; missing axes keep `default`
    pub fn opt_vec3(&self, field: &str, default: Vec3) -> Result<Vec3, DecodeError> {
        let Some(value) = self.attributes.get(field) else {
            return Ok(default);
        };
        let axes = value
            .as_object()
            .ok_or_else(|| self.invalid(field, "must be an object with x, y, z"))?;

        let mut out = default;
        for (index, axis) in ["x", "y", "z"].into_iter().enumerate() {
            if let Some(component) = axes.get(axis) {
                out[index] = self.number(&format!("{field}.{axis}"), component)?;
            }
        }
        Ok(out)
    }

    fn number(&self, field: &str, value: &Value) -> Result<f32, DecodeError> {
        #[allow(clippy::cast_possible_truncation)]
        let number = value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| self.invalid(field, "must be a number"))?;
        if number.is_finite() {
            Ok(number)
        } else {
            Err(self.invalid(field, "must be finite"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::ShapeType;
    use serde_json::json;

    #[test]
    fn test_decode_builtin_kinds() {
        let registry = ComponentRegistry::default();

        let scene = registry
            .decode("SceneComponent", &json!({ "transform": { "scale": { "x": 18.0, "y": 18.0 } } }))
            .unwrap();
        assert_eq!(scene.type_name(), "SceneComponent");

        let physics = registry
            .decode("PhysicsComponent", &json!({ "shape_type": "Circle", "collider_weight": 1.0 }))
            .unwrap();
        assert_eq!(physics.as_physics().map(|p| p.shape), Some(ShapeType::Circle));

        let input = registry.decode("InputComponent", &json!({})).unwrap();
        assert!(matches!(input, Component::Input(_)));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let registry = ComponentRegistry::default();
        let result = registry.decode("AudioComponent", &json!({}));
        assert_eq!(result, Err(DecodeError::UnknownComponentType("AudioComponent".to_string())));
    }

    #[test]
    fn test_missing_field_is_named() {
        let registry = ComponentRegistry::default();
        let result = registry.decode("PhysicsComponent", &json!({ "shape_type": "AABB" }));

        match result {
            Err(DecodeError::InvalidComponentSchema { component, field, .. }) => {
                assert_eq!(component, "PhysicsComponent");
                assert_eq!(field, "collider_weight");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_field_path() {
        let registry = ComponentRegistry::default();
        let result = registry.decode(
            "SceneComponent",
            &json!({ "transform": { "position": { "x": "left" } } }),
        );

        match result {
            Err(DecodeError::InvalidComponentSchema { field, .. }) => {
                assert_eq!(field, "transform.position.x");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_attributes_rejected() {
        let registry = ComponentRegistry::default();
        assert!(matches!(
            registry.decode("InputComponent", &json!([])),
            Err(DecodeError::InvalidComponentSchema { .. })
        ));
    }

    #[test]
    fn test_register_new_kind() {
        let mut registry = ComponentRegistry::default();
        registry.register("StaticColliderComponent", |tag: &str, attrs: &Attributes| {
            let fields = Fields::new(tag, attrs);
            let shape = fields.str("shape_type")?;
            let shape = shape
                .parse::<ShapeType>()
                .map_err(|reason| fields.invalid("shape_type", reason))?;
            Ok(Component::Physics(PhysicsComponent::new(shape, 0.0)))
        });

        let decoded = registry
            .decode("StaticColliderComponent", &json!({ "shape_type": "AABB" }))
            .unwrap();
        assert!(decoded.as_physics().is_some_and(PhysicsComponent::is_static));
        assert!(registry.is_registered("PhysicsComponent"));
    }
}
