//! Math utilities and types
//!
//! Provides the vector aliases and the scene transform shared by the
//! component, physics and render layers. The playfield is 2D: `x`/`y` carry
//! the simulation and `z` only orders draws.

pub use nalgebra::{
    Vector2, Vector3,
    Matrix4,
    Point3,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
///
/// Rotation is kept as Euler angles in degrees, the way archetype documents
/// author it. `rotation.z` is the in-plane angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world units
    pub position: Vec3,

    /// Euler rotation in degrees
    pub rotation: Vec3,

    /// Scale factors (also the collider extents)
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and scale
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Rotation as a unit quaternion
    pub fn quat(&self) -> Quat {
        Quat::from_euler_angles(
            utils::deg_to_rad(self.rotation.x),
            utils::deg_to_rad(self.rotation.y),
            utils::deg_to_rad(self.rotation.z),
        )
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.quat().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Position projected onto the playfield
    pub fn position_2d(&self) -> Vec2 {
        self.position.xy()
    }

    /// Compose a child transform expressed relative to `self`
    ///
    /// Angles are summed, which is exact for in-plane rotation.
    pub fn combine(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.quat() * self.scale.component_mul(&child.position),
            rotation: self.rotation + child.rotation,
            scale: self.scale.component_mul(&child.scale),
        }
    }

    /// Express a world-space planar offset in this transform's local frame
    ///
    /// Undoes the in-plane rotation and the planar scale. Zero scale axes are
    /// left unscaled.
    pub fn to_local_offset(&self, offset: Vec2) -> Vec2 {
        let (sin, cos) = utils::deg_to_rad(-self.rotation.z).sin_cos();
        let rotated = Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos);
        let unscale = |value: f32, scale: f32| {
            if scale.abs() > f32::EPSILON { value / scale } else { value }
        };
        Vec2::new(unscale(rotated.x, self.scale.x), unscale(rotated.y, self.scale.y))
    }

    /// True when every field is a finite number
    pub fn is_finite(&self) -> bool {
        utils::is_finite3(&self.position)
            && utils::is_finite3(&self.rotation)
            && utils::is_finite3(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Normalize a vector, leaving a zero-length vector at zero
    pub fn normalize_or_zero(v: Vec2) -> Vec2 {
        v.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros)
    }

    /// True when both components are finite
    pub fn is_finite2(v: &Vec2) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// True when all three components are finite
    pub fn is_finite3(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}
