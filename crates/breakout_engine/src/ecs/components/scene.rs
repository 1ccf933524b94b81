//! Scene component: the entity's placement in the world
//!
//! Every entity carries exactly one. Its transform is relative to the parent
//! entity, or to the world for roots.

use serde_json::{json, Value};

use crate::ecs::registry::{Attributes, DecodeError, Fields};
use crate::foundation::math::{Transform, Vec3};

/// Entity transform
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneComponent {
    /// Local transform
    pub transform: Transform,
}

impl SceneComponent {
    /// Document tag
    pub const TAG: &'static str = "SceneComponent";

    /// Create a scene component from a transform
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Decode from document attributes
    ///
    /// `transform` is required. Inside it `position`, `scale` and `rotation`
    /// default to zero, one and zero.
    pub fn decode(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        let transform = fields.object("transform")?;
        Ok(Self::new(Transform {
            position: transform.opt_vec3("position", Vec3::zeros())?,
            rotation: transform.opt_vec3("rotation", Vec3::zeros())?,
            scale: transform.opt_vec3("scale", Vec3::new(1.0, 1.0, 1.0))?,
        }))
    }

    /// Encode back to document attributes
    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(
            "transform".to_string(),
            json!({
                "position": vec3_value(&self.transform.position),
                "scale": vec3_value(&self.transform.scale),
                "rotation": vec3_value(&self.transform.rotation),
            }),
        );
        attrs
    }
}

fn vec3_value(v: &Vec3) -> Value {
    json!({ "x": v.x, "y": v.y, "z": v.z })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: &Value) -> Result<SceneComponent, DecodeError> {
        let attrs = value.as_object().unwrap();
        SceneComponent::decode(&Fields::new(SceneComponent::TAG, attrs))
    }

    #[test]
    fn test_decode_full_transform() {
        let scene = decode(&json!({
            "transform": {
                "position": { "x": 1.0, "y": 2.0, "z": 3.0 },
                "scale": { "x": 75.0, "y": 20.0, "z": 0.0 },
                "rotation": { "x": 0.0, "y": 0.0, "z": 45.0 }
            }
        }))
        .unwrap();

        assert_eq!(scene.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.transform.scale, Vec3::new(75.0, 20.0, 0.0));
        assert_eq!(scene.transform.rotation.z, 45.0);
    }

    #[test]
    fn test_missing_parts_use_defaults() {
        let scene = decode(&json!({ "transform": { "position": { "y": -5.0 } } })).unwrap();

        assert_eq!(scene.transform.position, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(scene.transform.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_missing_transform_rejected() {
        match decode(&json!({})) {
            Err(DecodeError::InvalidComponentSchema { field, .. }) => assert_eq!(field, "transform"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_attributes_decode_to_same_value() {
        let original = SceneComponent::new(Transform::from_position_scale(
            Vec3::new(4.0, -2.0, 0.0),
            Vec3::new(18.0, 18.0, 0.0),
        ));
        let attrs = Value::Object(original.to_attributes());
        assert_eq!(decode(&attrs).unwrap(), original);
    }
}
