//! Kinematics integration
//!
//! Motion is `velocity ⊙ direction`: velocity holds a speed per axis and the
//! direction gates and signs it. Only positions change here; velocity and
//! direction are left for the resolver and for input.

use super::SimulationError;
use crate::ecs::entity::EntityId;
use crate::ecs::world::World;
use crate::foundation::math::{utils, Vec2};

/// Explicit Euler position integrator
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicsIntegrator;

impl KinematicsIntegrator {
    /// Create an integrator
    pub fn new() -> Self {
        Self
    }

    /// Advance every moving entity by `dt` seconds
    ///
    /// Offsets are world-space and converted into the parent frame for
    /// children. Non-finite input or results fail the step naming the entity.
    pub fn step(&self, world: &mut World, dt: f32) -> Result<(), SimulationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimulationError::InvalidSimulationState(format!(
                "time step must be a positive number, got {dt}"
            )));
        }

        let moving: Vec<(EntityId, Vec2)> = world
            .iter()
            .filter(|entity| entity.components().scene().is_some())
            .filter(|entity| entity.velocity() != Vec2::zeros())
            .map(|entity| (entity.id(), entity.velocity().component_mul(&entity.direction()) * dt))
            .collect();

        for (id, offset) in &moving {
            if !utils::is_finite2(offset) {
                let entity = world.get(*id)?;
                return Err(SimulationError::InvalidSimulationState(format!(
                    "{} {:?} has non-finite motion (velocity {:?}, direction {:?})",
                    entity.archetype(),
                    id,
                    entity.velocity(),
                    entity.direction()
                )));
            }
            world.translate_world(*id, *offset)?;

            let position = world.get(*id)?.position();
            if !utils::is_finite3(&position) {
                return Err(SimulationError::InvalidSimulationState(format!(
                    "{id:?} moved to non-finite position {position:?}"
                )));
            }
        }
        log::trace!("Integrated {} moving entities over {dt}s", moving.len());
        Ok(())
    }
}
