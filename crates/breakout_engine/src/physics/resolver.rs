//! Collision response
//!
//! Pairs are resolved one at a time in detector order. Each pair is tested
//! again against the current world first, because an earlier pair may already
//! have pushed one of its entities apart or a handler may have destroyed it.

use super::collision::{self, Contact};
use super::collision_system::{CollisionPair, PhysicsBody};
use super::SimulationError;
use crate::ecs::entity::EntityId;
use crate::ecs::world::World;
use crate::foundation::math::Vec2;

/// Reflect `direction` about the plane with unit normal `normal`
pub fn reflect(direction: Vec2, normal: Vec2) -> Vec2 {
    direction - normal * (2.0 * direction.dot(&normal))
}

/// A pair that was still overlapping when it was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCollision {
    /// First entity
    pub a: EntityId,
    /// Second entity
    pub b: EntityId,
    /// Separation direction of `a` at resolution time
    pub normal: Vec2,
    /// Penetration depth before correction
    pub depth: f32,
}

impl ResolvedCollision {
    /// The other party, if `id` takes part
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

/// Game reaction to resolved collisions
///
/// Runs right after a pair is resolved, before the next pair. Entities it
/// destroys are skipped by every later pair of the tick.
pub trait CollisionHandler {
    /// Called once per resolved pair
    fn on_collision(&mut self, world: &mut World, collision: &ResolvedCollision) -> Result<(), SimulationError>;
}

impl CollisionHandler for () {
    fn on_collision(&mut self, _world: &mut World, _collision: &ResolvedCollision) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// Positional correction and direction response
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    fallback_normal: Vec2,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(Vec2::new(1.0, 0.0))
    }
}

impl CollisionResolver {
    /// Create a resolver; `fallback_normal` is used for coincident shapes
    pub fn new(fallback_normal: Vec2) -> Self {
        let fallback_normal = fallback_normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec2::new(1.0, 0.0));
        Self { fallback_normal }
    }

    /// Resolve one pair against the current world
    ///
    /// Returns `None` when either entity is gone or the pair no longer
    /// overlaps.
    pub fn resolve(&self, world: &mut World, pair: &CollisionPair) -> Result<Option<ResolvedCollision>, SimulationError> {
        if !world.contains(pair.a) || !world.contains(pair.b) {
            log::trace!("Skipping pair {:?} / {:?}: entity destroyed", pair.a, pair.b);
            return Ok(None);
        }
        let (Some(a), Some(b)) = (PhysicsBody::sample(world, pair.a)?, PhysicsBody::sample(world, pair.b)?) else {
            return Ok(None);
        };
        let Some(contact) = collision::test(&a.collider, &b.collider, self.fallback_normal) else {
            log::trace!("Pair {:?} / {:?} already separated", pair.a, pair.b);
            return Ok(None);
        };

        Self::correct_positions(world, &a, &b, &contact)?;
        Self::respond(world, &a, contact.normal)?;
        Self::respond(world, &b, -contact.normal)?;

        Ok(Some(ResolvedCollision {
            a: a.id,
            b: b.id,
            normal: contact.normal,
            depth: contact.depth,
        }))
    }

    /// Resolve pairs in order, calling `handler` after each resolved one
    pub fn resolve_all<H: CollisionHandler + ?Sized>(
        &self,
        world: &mut World,
        pairs: &[CollisionPair],
        handler: &mut H,
    ) -> Result<Vec<ResolvedCollision>, SimulationError> {
        let mut resolved = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if let Some(collision) = self.resolve(world, pair)? {
                handler.on_collision(world, &collision)?;
                resolved.push(collision);
            }
        }
        log::debug!("Resolved {} of {} pairs", resolved.len(), pairs.len());
        Ok(resolved)
    }

    /// Split the overlap by inverse weight; two static colliders stay put
    fn correct_positions(
        world: &mut World,
        a: &PhysicsBody,
        b: &PhysicsBody,
        contact: &Contact,
    ) -> Result<(), SimulationError> {
        let inverse_a = a.physics.inverse_weight();
        let inverse_b = b.physics.inverse_weight();
        let total = inverse_a + inverse_b;
        if total <= 0.0 {
            return Ok(());
        }

        let correction = contact.normal * contact.depth;
        if inverse_a > 0.0 {
            world.translate_world(a.id, correction * (inverse_a / total))?;
        }
        if inverse_b > 0.0 {
            world.translate_world(b.id, -correction * (inverse_b / total))?;
        }
        Ok(())
    }

    /// Reflect the heading of a moving party that travels into the contact
    fn respond(world: &mut World, body: &PhysicsBody, normal: Vec2) -> Result<(), SimulationError> {
        if body.physics.is_static() || body.velocity == Vec2::zeros() {
            return Ok(());
        }
        let motion = body.velocity.component_mul(&body.direction);
        if motion.dot(&normal) >= 0.0 {
            return Ok(());
        }

        world.set_direction(body.id, reflect(body.direction, normal))?;
        let modifier = body.physics.speed_modifier;
        if modifier != 1.0 {
            world.set_velocity(body.id, body.velocity * modifier)?;
        }
        Ok(())
    }
}
