//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."

bitflags::bitflags! {
    /// Collision layer bits
    ///
    /// Documents carry layers as raw `u32` values; bits without a name here
    /// are kept as-is so games can define their own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Balls and other projectiles
        const BALL = 1 << 0;
        /// Player-controlled paddles
        const PADDLE = 1 << 1;
        /// Destructible bricks
        const BRICK = 1 << 2;
        /// Playfield boundaries
        const WALL = 1 << 3;
        /// Pickups falling from bricks
        const PICKUP = 1 << 4;
        /// Every bit, named or not
        const ALL = u32::MAX;
    }
}

impl CollisionLayers {
    /// Check if two colliders should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::BALL, CollisionLayers::PADDLE | CollisionLayers::BRICK,
            CollisionLayers::BRICK, CollisionLayers::BALL,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Ball wants the pickup, but the pickup only reacts to paddles
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::BALL, CollisionLayers::ALL,
            CollisionLayers::PICKUP, CollisionLayers::PADDLE,
        ));
    }

    #[test]
    fn test_unnamed_bits_survive() {
        let custom = CollisionLayers::from_bits_retain(1 << 20);
        assert_eq!(custom.bits(), 1 << 20);
        assert!(CollisionLayers::should_collide(
            custom, CollisionLayers::ALL,
            CollisionLayers::BALL, custom,
        ));
    }
}
