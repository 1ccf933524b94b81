//! Narrow-phase intersection tests
//!
//! Every test returns the contact as seen from the first collider: `normal`
//! is the unit direction the first collider has to move to separate from the
//! second one, `depth` the overlap along it.

use super::shapes::Collider;
use crate::foundation::math::Vec2;

/// Overlap between two colliders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Separation direction of the first collider
    pub normal: Vec2,
    /// Penetration depth, always positive
    pub depth: f32,
}

impl Contact {
    /// The same contact seen from the other collider
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// Test two colliders for overlap
///
/// Points are circles of radius zero; two points never collide. `fallback`
/// replaces the normal when the geometry gives no direction (coincident
/// centers).
pub fn test(a: &Collider, b: &Collider, fallback: Vec2) -> Option<Contact> {
    use Collider::*;

    match (*a, *b) {
        (Point { .. }, Point { .. }) => None,
        (Point { center: ca }, Circle { center: cb, radius: rb }) => circle_circle(ca, 0.0, cb, rb, fallback),
        (Circle { center: ca, radius: ra }, Point { center: cb }) => circle_circle(ca, ra, cb, 0.0, fallback),
        (Circle { center: ca, radius: ra }, Circle { center: cb, radius: rb }) => {
            circle_circle(ca, ra, cb, rb, fallback)
        }
        (Point { center }, Aabb { center: box_center, half_extents }) => {
            circle_aabb(center, 0.0, box_center, half_extents, fallback)
        }
        (Circle { center, radius }, Aabb { center: box_center, half_extents }) => {
            circle_aabb(center, radius, box_center, half_extents, fallback)
        }
        (Aabb { center: box_center, half_extents }, Point { center }) => {
            circle_aabb(center, 0.0, box_center, half_extents, fallback).map(Contact::flipped)
        }
        (Aabb { center: box_center, half_extents }, Circle { center, radius }) => {
            circle_aabb(center, radius, box_center, half_extents, fallback).map(Contact::flipped)
        }
        (Aabb { center: ca, half_extents: ha }, Aabb { center: cb, half_extents: hb }) => {
            aabb_aabb(ca, ha, cb, hb, fallback)
        }
    }
}

/// Circle against circle
///
/// Overlap iff the center distance is below the radius sum.
pub fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32, fallback: Vec2) -> Option<Contact> {
    let delta = ca - cb;
    let distance = delta.magnitude();
    let reach = ra + rb;
    if distance >= reach {
        return None;
    }

    let normal = if distance > f32::EPSILON { delta / distance } else { fallback };
    Some(Contact {
        normal,
        depth: reach - distance,
    })
}

/// Circle against an axis-aligned box, normal pointing away from the box
pub fn circle_aabb(center: Vec2, radius: f32, box_center: Vec2, half: Vec2, fallback: Vec2) -> Option<Contact> {
    let min = box_center - half;
    let max = box_center + half;
    let inside = center.x >= min.x && center.x <= max.x && center.y >= min.y && center.y <= max.y;

    if !inside {
        let nearest = Vec2::new(center.x.clamp(min.x, max.x), center.y.clamp(min.y, max.y));
        let delta = center - nearest;
        let distance = delta.magnitude();
        if distance >= radius {
            return None;
        }
        let normal = if distance > f32::EPSILON { delta / distance } else { fallback };
        return Some(Contact {
            normal,
            depth: radius - distance,
        });
    }

    // Center inside the box or on its edge: push out through the nearest face
    let local = center - box_center;
    let face_x = half.x - local.x.abs();
    let face_y = half.y - local.y.abs();
    let (normal, face) = if face_x < face_y {
        (Vec2::new(sign(local.x, fallback.x), 0.0), face_x)
    } else {
        (Vec2::new(0.0, sign(local.y, fallback.y)), face_y)
    };
    let depth = radius + face;
    if depth <= 0.0 {
        return None;
    }
    Some(Contact {
        normal: if normal == Vec2::zeros() { fallback } else { normal },
        depth,
    })
}

/// Box against box, separating along the axis of least penetration
///
/// When the centers are level on that axis the direction is ambiguous and
/// the dominant axis of `fallback` is used instead.
pub fn aabb_aabb(ca: Vec2, ha: Vec2, cb: Vec2, hb: Vec2, fallback: Vec2) -> Option<Contact> {
    let delta = ca - cb;
    let overlap_x = ha.x + hb.x - delta.x.abs();
    let overlap_y = ha.y + hb.y - delta.y.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    // Ties go to the y axis, the axis the ball usually travels on
    let mut along_x = overlap_x < overlap_y;
    let level = if along_x { delta.x == 0.0 } else { delta.y == 0.0 };
    if level {
        along_x = fallback.x.abs() > fallback.y.abs();
    }

    if along_x {
        Some(Contact {
            normal: Vec2::new(sign(delta.x, fallback.x), 0.0),
            depth: overlap_x,
        })
    } else {
        Some(Contact {
            normal: Vec2::new(0.0, sign(delta.y, fallback.y)),
            depth: overlap_y,
        })
    }
}

/// Sign of `value`, or of `fallback` when `value` is zero
fn sign(value: f32, fallback: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else if fallback < 0.0 {
        -1.0
    } else if fallback > 0.0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fallback() -> Vec2 {
        Vec2::new(1.0, 0.0)
    }

    fn circle(x: f32, y: f32, radius: f32) -> Collider {
        Collider::Circle { center: Vec2::new(x, y), radius }
    }

    fn aabb(x: f32, y: f32, hx: f32, hy: f32) -> Collider {
        Collider::Aabb { center: Vec2::new(x, y), half_extents: Vec2::new(hx, hy) }
    }

    #[test]
    fn test_ball_resting_on_paddle() {
        let ball = circle(0.0, -241.0, 9.0);
        let paddle = aabb(0.0, -250.0, 37.5, 10.0);

        let contact = test(&ball, &paddle, fallback()).unwrap();
        assert_relative_eq!(contact.depth, 10.0, epsilon = 1e-4);
        assert_relative_eq!(contact.normal, Vec2::new(0.0, 1.0), epsilon = 1e-6);

        // Seen from the paddle the normal points down into the ball
        let reversed = test(&paddle, &ball, fallback()).unwrap();
        assert_relative_eq!(reversed.normal, Vec2::new(0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(reversed.depth, contact.depth, epsilon = 1e-6);
    }

    #[test]
    fn test_circle_circle() {
        let contact = test(&circle(3.0, 0.0, 2.0), &circle(0.0, 0.0, 2.0), fallback()).unwrap();
        assert_relative_eq!(contact.normal, Vec2::new(1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(contact.depth, 1.0, epsilon = 1e-6);

        assert!(test(&circle(4.0, 0.0, 2.0), &circle(0.0, 0.0, 2.0), fallback()).is_none());
    }

    #[test]
    fn test_coincident_circles_use_fallback() {
        let contact = test(&circle(1.0, 1.0, 1.0), &circle(1.0, 1.0, 1.0), Vec2::new(0.0, 1.0)).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.depth, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_circle_corner_contact() {
        let contact = test(&circle(12.0, 12.0, 3.0), &aabb(0.0, 0.0, 10.0, 10.0), fallback()).unwrap();
        let expected = Vec2::new(1.0, 1.0).normalize();
        assert_relative_eq!(contact.normal, expected, epsilon = 1e-6);
        assert_relative_eq!(contact.depth, 3.0 - 8.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_circle_center_inside_box() {
        let contact = test(&circle(8.0, 1.0, 1.0), &aabb(0.0, 0.0, 10.0, 10.0), fallback()).unwrap();
        assert_eq!(contact.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(contact.depth, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_aabb_aabb_least_penetration() {
        let contact = test(&aabb(0.0, 9.0, 5.0, 5.0), &aabb(0.0, 0.0, 5.0, 5.0), fallback()).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.depth, 1.0, epsilon = 1e-6);

        let contact = test(&aabb(-8.0, 1.0, 5.0, 5.0), &aabb(0.0, 0.0, 5.0, 5.0), fallback()).unwrap();
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        assert_relative_eq!(contact.depth, 2.0, epsilon = 1e-6);

        // Touching edges do not overlap
        assert!(test(&aabb(10.0, 0.0, 5.0, 5.0), &aabb(0.0, 0.0, 5.0, 5.0), fallback()).is_none());
    }

    #[test]
    fn test_coincident_boxes_use_fallback() {
        let paddle = aabb(0.0, -250.0, 37.5, 10.0);

        let contact = test(&paddle, &paddle, Vec2::new(0.0, -1.0)).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(contact.depth, 20.0, epsilon = 1e-6);

        let contact = test(&paddle, &paddle, Vec2::new(-1.0, 0.0)).unwrap();
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        assert_relative_eq!(contact.depth, 75.0, epsilon = 1e-6);

        // Level on x only: the offset on y still decides the sign
        let contact = test(&aabb(0.0, -1.0, 5.0, 5.0), &aabb(0.0, 0.0, 1.0, 5.0), Vec2::new(0.0, 1.0)).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(contact.depth, 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_points() {
        let point = Collider::Point { center: Vec2::new(0.5, 0.0) };
        assert!(test(&point, &circle(0.0, 0.0, 1.0), fallback()).is_some());
        assert!(test(&point, &aabb(0.0, 0.0, 1.0, 1.0), fallback()).is_some());
        assert!(test(&point, &point, fallback()).is_none());
    }
}
