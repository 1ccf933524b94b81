//! Physics component: collider shape and response tuning
//!
//! The collider takes its extents from the owning entity's scene scale, so the
//! component itself only records which shape to build and how the entity
//! takes part in collision response.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::ecs::registry::{Attributes, DecodeError, Fields};
use crate::physics::collision_layers::CollisionLayers;

/// Collider shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    /// Zero-extent point at the entity position
    Point,
    /// Circle with radius `scale.x / 2`
    Circle,
    /// Axis-aligned box with half-extents `scale.xy / 2`
    Aabb,
}

impl ShapeType {
    /// Name used in documents
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Circle => "Circle",
            Self::Aabb => "AABB",
        }
    }
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(Self::Point),
            "Circle" => Ok(Self::Circle),
            "AABB" => Ok(Self::Aabb),
            other => Err(format!("has unknown shape \"{other}\" (expected Point, Circle or AABB)")),
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collider description of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsComponent {
    /// Shape built from the scene transform
    pub shape: ShapeType,

    /// Resolution priority; 0 means immovable
    pub collider_weight: f32,

    /// Layers this collider belongs to
    pub layer: CollisionLayers,

    /// Layers this collider reacts to
    pub mask: CollisionLayers,

    /// Factor applied to velocity when the direction is reflected
    pub speed_modifier: f32,
}

impl PhysicsComponent {
    /// Document tag
    pub const TAG: &'static str = "PhysicsComponent";

    /// Create a collider on every layer with a neutral speed modifier
    pub fn new(shape: ShapeType, collider_weight: f32) -> Self {
        Self {
            shape,
            collider_weight,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            speed_modifier: 1.0,
        }
    }

    /// Set layer membership and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Set the speed modifier
    pub fn with_speed_modifier(mut self, modifier: f32) -> Self {
        self.speed_modifier = modifier;
        self
    }

    /// Immovable colliders never move during resolution
    pub fn is_static(&self) -> bool {
        self.collider_weight == 0.0
    }

    /// Share of positional correction this collider absorbs, 0 when static
    pub fn inverse_weight(&self) -> f32 {
        if self.is_static() {
            0.0
        } else {
            self.collider_weight.recip()
        }
    }

    /// Decode from document attributes
    pub fn decode(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        let shape = fields
            .str("shape_type")?
            .parse::<ShapeType>()
            .map_err(|reason| fields.invalid("shape_type", reason))?;

        let collider_weight = fields.f32("collider_weight")?;
        if collider_weight < 0.0 {
            return Err(fields.invalid("collider_weight", "must not be negative"));
        }

        let mut physics = Self::new(shape, collider_weight);
        if let Some(bits) = fields.opt_u32("collision_layer")? {
            physics.layer = CollisionLayers::from_bits_retain(bits);
        }
        if let Some(bits) = fields.opt_u32("collision_mask")? {
            physics.mask = CollisionLayers::from_bits_retain(bits);
        }
        if let Some(modifier) = fields.opt_f32("speed_modifier")? {
            if modifier <= 0.0 {
                return Err(fields.invalid("speed_modifier", "must be positive"));
            }
            physics.speed_modifier = modifier;
        }
        Ok(physics)
    }

    /// Encode back to document attributes
    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("shape_type".to_string(), Value::from(self.shape.as_str()));
        attrs.insert("collider_weight".to_string(), Value::from(self.collider_weight));
        attrs.insert("collision_layer".to_string(), Value::from(self.layer.bits()));
        attrs.insert("collision_mask".to_string(), Value::from(self.mask.bits()));
        attrs.insert("speed_modifier".to_string(), Value::from(self.speed_modifier));
        attrs
    }
}
