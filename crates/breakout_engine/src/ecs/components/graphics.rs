//! Graphics binding component
//!
//! Opaque references a renderer resolves. The core never interprets them.

use serde_json::Value;

use crate::ecs::registry::{Attributes, DecodeError, Fields};

/// Material and model a renderer should draw the entity with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsComponent {
    /// Material identifier (`"Material"` in documents)
    pub material: String,

    /// Model identifier (`"Model"` in documents)
    pub model: String,
}

impl GraphicsComponent {
    /// Document tag
    pub const TAG: &'static str = "GraphicsComponent";

    /// Create a graphics binding
    pub fn new(material: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            model: model.into(),
        }
    }

    /// Decode from document attributes
    pub fn decode(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self::new(fields.str("Material")?, fields.str("Model")?))
    }

    /// Encode back to document attributes
    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("Material".to_string(), Value::from(self.material.clone()));
        attrs.insert("Model".to_string(), Value::from(self.model.clone()));
        attrs
    }
}
