//! World-space collider shapes
//!
//! GEA 13.3.4: "Store collision shapes in model space, transform on-the-fly
//! during tests". Physics components only name a shape kind; the extents come
//! from the entity's world transform each time a collider is built.

use crate::ecs::components::ShapeType;
use crate::foundation::math::{Transform, Vec2};

/// Axis-aligned bounds used by the broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Bounds {
    /// Check whether two bounds touch or overlap
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Collider placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Zero-extent point
    Point {
        /// Position
        center: Vec2,
    },
    /// Circle
    Circle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f32,
    },
    /// Axis-aligned box
    Aabb {
        /// Center
        center: Vec2,
        /// Half width and half height
        half_extents: Vec2,
    },
}

impl Collider {
    /// Build the collider for `shape` placed by a world transform
    ///
    /// Circles use half of `scale.x` as radius, boxes use half of
    /// `scale.xy` as half-extents. Negative scales are mirrored, not inverted.
    pub fn from_transform(shape: ShapeType, transform: &Transform) -> Self {
        let center = transform.position_2d();
        let half = transform.scale.xy().abs() * 0.5;
        match shape {
            ShapeType::Point => Self::Point { center },
            ShapeType::Circle => Self::Circle {
                center,
                radius: half.x,
            },
            ShapeType::Aabb => Self::Aabb {
                center,
                half_extents: half,
            },
        }
    }

    /// Center (or position) of the collider
    pub fn center(&self) -> Vec2 {
        match *self {
            Self::Point { center } | Self::Circle { center, .. } | Self::Aabb { center, .. } => center,
        }
    }

    /// Bounding box
    pub fn bounds(&self) -> Bounds {
        let (center, half) = match *self {
            Self::Point { center } => (center, Vec2::zeros()),
            Self::Circle { center, radius } => (center, Vec2::new(radius, radius)),
            Self::Aabb { center, half_extents } => (center, half_extents),
        };
        Bounds {
            min: center - half,
            max: center + half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_ball_radius_is_half_scale() {
        let transform = Transform::from_position_scale(Vec3::zeros(), Vec3::new(18.0, 18.0, 0.0));
        assert_eq!(
            Collider::from_transform(ShapeType::Circle, &transform),
            Collider::Circle { center: Vec2::zeros(), radius: 9.0 }
        );
    }

    #[test]
    fn test_paddle_half_extents() {
        let transform = Transform::from_position_scale(Vec3::new(0.0, -250.0, 0.0), Vec3::new(75.0, 20.0, 0.0));
        let collider = Collider::from_transform(ShapeType::Aabb, &transform);

        assert_eq!(
            collider,
            Collider::Aabb { center: Vec2::new(0.0, -250.0), half_extents: Vec2::new(37.5, 10.0) }
        );
        assert_eq!(collider.bounds().min, Vec2::new(-37.5, -260.0));
        assert_eq!(collider.bounds().max, Vec2::new(37.5, -240.0));
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Collider::Circle { center: Vec2::zeros(), radius: 1.0 }.bounds();
        let b = Collider::Point { center: Vec2::new(1.0, 1.0) }.bounds();
        let c = Collider::Point { center: Vec2::new(1.5, 0.0) }.bounds();

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
