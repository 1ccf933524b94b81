//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! Detection runs over [`PhysicsBody`] samples rather than the live world, so
//! every pair of a tick is computed from the same positions. The playfield
//! holds a few dozen colliders; the broad phase is a bounds check per pair.

use super::collision::{self, Contact};
use super::shapes::Collider;
use crate::ecs::components::PhysicsComponent;
use crate::ecs::entity::EntityId;
use crate::ecs::world::{StoreError, World};
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::CollisionLayers;

/// Physics-relevant state of one entity, sampled at detection time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    /// Sampled entity
    pub id: EntityId,
    /// Collider in world space
    pub collider: Collider,
    /// Collider settings
    pub physics: PhysicsComponent,
    /// Per-axis speed
    pub velocity: Vec2,
    /// Heading
    pub direction: Vec2,
}

impl PhysicsBody {
    /// Sample an entity, `None` when it has no physics component
    pub fn sample(world: &World, id: EntityId) -> Result<Option<Self>, StoreError> {
        let entity = world.get(id)?;
        let Some(physics) = entity.physics() else {
            return Ok(None);
        };
        let transform = world.world_transform(id)?;
        Ok(Some(Self {
            id,
            collider: Collider::from_transform(physics.shape, &transform),
            physics: *physics,
            velocity: entity.velocity(),
            direction: entity.direction(),
        }))
    }

    /// Sample every physics-bearing entity in spawn order
    pub fn sample_all(world: &World) -> Result<Vec<Self>, StoreError> {
        let mut bodies = Vec::new();
        for entity in world.physics_entities() {
            if let Some(body) = Self::sample(world, entity.id())? {
                bodies.push(body);
            }
        }
        Ok(bodies)
    }

    /// Check the layer/mask filter in both directions
    pub fn accepts(&self, other: &PhysicsBody) -> bool {
        CollisionLayers::should_collide(self.physics.layer, self.physics.mask, other.physics.layer, other.physics.mask)
    }
}

/// Two overlapping entities
///
/// `normal` is the direction `a` has to move to separate from `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    /// First entity, earlier in spawn order
    pub a: EntityId,
    /// Second entity
    pub b: EntityId,
    /// Separation direction of `a`
    pub normal: Vec2,
    /// Penetration depth
    pub depth: f32,
}

impl CollisionPair {
    /// Contact part of the pair
    pub fn contact(&self) -> Contact {
        Contact {
            normal: self.normal,
            depth: self.depth,
        }
    }

    /// Check whether `id` takes part in this pair
    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }

    /// The other party of the pair
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Pairwise detector (GEA 13.3)
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    fallback_normal: Vec2,
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(Vec2::new(1.0, 0.0))
    }
}

impl CollisionDetector {
    /// Create a detector; `fallback_normal` is used for coincident shapes
    pub fn new(fallback_normal: Vec2) -> Self {
        let fallback_normal = fallback_normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec2::new(1.0, 0.0));
        Self { fallback_normal }
    }

    /// Normal used when the geometry gives no direction
    pub fn fallback_normal(&self) -> Vec2 {
        self.fallback_normal
    }

    /// Find every overlapping pair
    ///
    /// Pairs come out in `(i, j)` order with `i < j` over `bodies`, each
    /// unordered pair at most once.
    pub fn detect(&self, bodies: &[PhysicsBody]) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();
        for (i, a) in bodies.iter().enumerate() {
            let bounds_a = a.collider.bounds();
            for b in &bodies[i + 1..] {
                if !a.accepts(b) || !bounds_a.overlaps(&b.collider.bounds()) {
                    continue;
                }
                if let Some(pair) = self.test_pair(a, b) {
                    log::trace!("Contact {:?} / {:?}: normal {:?}, depth {}", a.id, b.id, pair.normal, pair.depth);
                    pairs.push(pair);
                }
            }
        }
        pairs
    }

    /// Sample `world` and detect over the result
    pub fn detect_world(&self, world: &World) -> Result<Vec<CollisionPair>, StoreError> {
        let bodies = PhysicsBody::sample_all(world)?;
        Ok(self.detect(&bodies))
    }

    /// Narrow-phase test of one pair, ignoring layers
    pub fn test_pair(&self, a: &PhysicsBody, b: &PhysicsBody) -> Option<CollisionPair> {
        collision::test(&a.collider, &b.collider, self.fallback_normal).map(|contact| CollisionPair {
            a: a.id,
            b: b.id,
            normal: contact.normal,
            depth: contact.depth,
        })
    }
}
